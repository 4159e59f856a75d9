//! Time-ordered storage of accepted state points with interpolation.

mod interpolator;

pub use interpolator::Interpolator;

use std::collections::VecDeque;

use marcher_core::StatePoint;
use thiserror::Error;

/// Errors raised by an [`InterpolationBuffer`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("the interpolation buffer is empty")]
    Empty,

    #[error("time {t} is outside the buffered range [{lower}, {upper}]")]
    OutOfRange { t: f64, lower: f64, upper: f64 },

    #[error("point at t = {t} does not follow the last buffered time {last}")]
    NotIncreasing { t: f64, last: f64 },
}

/// An ordered history of state points.
///
/// Points must be added in strictly increasing time order. With a storage
/// limit, adding a point to a full buffer drops the oldest one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterpolationBuffer {
    interpolator: Interpolator,
    storage_limit: Option<usize>,
    points: VecDeque<StatePoint>,
}

impl InterpolationBuffer {
    /// Creates an empty buffer.
    ///
    /// A storage limit of zero is treated as one.
    #[must_use]
    pub fn new(interpolator: Interpolator, storage_limit: Option<usize>) -> Self {
        Self {
            interpolator,
            storage_limit: storage_limit.map(|limit| limit.max(1)),
            points: VecDeque::new(),
        }
    }

    /// Appends a point, evicting the oldest one if the buffer is full.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotIncreasing`] if `point.t` is not after the last
    /// stored time.
    pub fn push(&mut self, point: StatePoint) -> Result<(), Error> {
        if let Some(last) = self.points.back() {
            if point.t <= last.t || point.t.is_nan() {
                return Err(Error::NotIncreasing {
                    t: point.t,
                    last: last.t,
                });
            }
        }

        if self
            .storage_limit
            .is_some_and(|limit| self.points.len() >= limit)
        {
            self.points.pop_front();
        }
        self.points.push_back(point);
        Ok(())
    }

    /// Returns the state at `t`, interpolating between the bracketing nodes.
    ///
    /// A `t` equal to a stored node time returns that node unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is empty or `t` lies outside the
    /// stored range.
    pub fn interpolate(&self, t: f64) -> Result<StatePoint, Error> {
        let (lower, upper) = self.time_range().ok_or(Error::Empty)?;
        if !(lower..=upper).contains(&t) {
            return Err(Error::OutOfRange { t, lower, upper });
        }

        let i = self.points.partition_point(|p| p.t < t);
        let right = &self.points[i];
        if right.t == t {
            return Ok(right.clone());
        }

        // `t > lower` here, so the bracketing node to the left exists.
        let left = &self.points[i - 1];
        Ok(self.interpolator.interpolate(left, right, t))
    }

    /// Returns the first and last stored times.
    #[must_use]
    pub fn time_range(&self) -> Option<(f64, f64)> {
        Some((self.points.front()?.t, self.points.back()?.t))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatePoint> {
        self.points.iter()
    }

    #[must_use]
    pub fn first(&self) -> Option<&StatePoint> {
        self.points.front()
    }

    #[must_use]
    pub fn last(&self) -> Option<&StatePoint> {
        self.points.back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    #[must_use]
    pub fn interpolator(&self) -> Interpolator {
        self.interpolator
    }

    #[must_use]
    pub fn storage_limit(&self) -> Option<usize> {
        self.storage_limit
    }
}
