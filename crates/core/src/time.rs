use thiserror::Error;

/// Errors that can occur when constructing a [`TimeRange`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TimeRangeError {
    #[error("time range bounds must be finite, got [{lower}, {upper}]")]
    NonFinite { lower: f64, upper: f64 },

    #[error("time range lower bound {lower} exceeds upper bound {upper}")]
    Reversed { lower: f64, upper: f64 },
}

/// A closed time interval `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRange {
    lower: f64,
    upper: f64,
}

impl TimeRange {
    /// Creates a new time range.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is non-finite or `lower > upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, TimeRangeError> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(TimeRangeError::NonFinite { lower, upper });
        }
        if lower > upper {
            return Err(TimeRangeError::Reversed { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    #[must_use]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[must_use]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Returns `upper - lower`.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.upper - self.lower
    }

    /// Returns true if `t` lies in the closed interval.
    #[must_use]
    pub fn contains(&self, t: f64) -> bool {
        self.lower <= t && t <= self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn length_is_upper_minus_lower() {
        let range = TimeRange::new(0.25, 1.75).unwrap();
        assert_relative_eq!(range.length(), 1.5);
        assert!(range.contains(0.25));
        assert!(range.contains(1.75));
        assert!(!range.contains(1.8));
    }

    #[test]
    fn degenerate_range_is_allowed() {
        let range = TimeRange::new(2.0, 2.0).unwrap();
        assert_relative_eq!(range.length(), 0.0);
    }

    #[test]
    fn rejects_reversed_bounds() {
        assert_eq!(
            TimeRange::new(1.0, 0.0),
            Err(TimeRangeError::Reversed {
                lower: 1.0,
                upper: 0.0
            })
        );
    }

    #[test]
    fn rejects_non_finite_bounds() {
        assert!(matches!(
            TimeRange::new(0.0, f64::INFINITY),
            Err(TimeRangeError::NonFinite { .. })
        ));
    }
}
