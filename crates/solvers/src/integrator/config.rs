use marcher_core::TimeRange;
use thiserror::Error;

/// How the integrator chooses each step size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum IntegrationControl {
    /// Each step goes straight to the final time.
    #[default]
    None,

    /// Step sizes from a [`SimpleControl`] strategy.
    Simple(SimpleControl),
}

/// A simple step-size strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimpleControl {
    /// Steps toward the final time, each at most `max_dt` when set.
    Variable { max_dt: Option<f64> },

    /// Steps of a fixed size.
    FixedDt(f64),

    /// Divides the time range into this many equal steps.
    FixedSteps(usize),
}

impl IntegrationControl {
    /// Returns the next step size, given the range and the time remaining.
    pub(crate) fn step_size(&self, range: &TimeRange, remaining: f64) -> f64 {
        match self {
            Self::None => remaining,
            Self::Simple(SimpleControl::Variable { max_dt }) => {
                max_dt.map_or(remaining, |max_dt| max_dt.min(remaining))
            }
            Self::Simple(SimpleControl::FixedDt(dt)) => *dt,
            #[allow(clippy::cast_precision_loss)]
            Self::Simple(SimpleControl::FixedSteps(n)) => range.length() / *n as f64,
        }
    }
}

/// Configuration for the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    control: IntegrationControl,
    land_on_final_time: bool,
    max_steps: usize,
}

/// Errors that can occur when building an integrator config.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("fixed step size must be finite and positive, got {0}")]
    StepSize(f64),

    #[error("number of time steps must be at least 1")]
    NumSteps,

    #[error("max dt must be positive, got {0}")]
    MaxDt(f64),

    #[error("max number of time steps must be at least 1")]
    MaxSteps,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            control: IntegrationControl::None,
            land_on_final_time: true,
            max_steps: 10_000,
        }
    }
}

impl Config {
    /// Creates a new config with a validated control strategy.
    ///
    /// # Errors
    ///
    /// Returns an error if a step size is non-positive or non-finite, a step
    /// count is zero, or `max_steps` is zero.
    pub fn new(
        control: IntegrationControl,
        land_on_final_time: bool,
        max_steps: usize,
    ) -> Result<Self, ConfigError> {
        if let IntegrationControl::Simple(simple) = control {
            match simple {
                SimpleControl::FixedDt(dt) if !dt.is_finite() || dt <= 0.0 => {
                    return Err(ConfigError::StepSize(dt));
                }
                SimpleControl::FixedSteps(0) => return Err(ConfigError::NumSteps),
                SimpleControl::Variable {
                    max_dt: Some(max_dt),
                } if max_dt.is_nan() || max_dt <= 0.0 => {
                    return Err(ConfigError::MaxDt(max_dt));
                }
                _ => {}
            }
        }
        if max_steps == 0 {
            return Err(ConfigError::MaxSteps);
        }

        Ok(Self {
            control,
            land_on_final_time,
            max_steps,
        })
    }

    /// Creates a config taking steps of size `dt`, landing on the final time.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is non-positive or non-finite.
    pub fn fixed_dt(dt: f64) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Self::new(
            IntegrationControl::Simple(SimpleControl::FixedDt(dt)),
            defaults.land_on_final_time,
            defaults.max_steps,
        )
    }

    #[must_use]
    pub fn control(&self) -> IntegrationControl {
        self.control
    }

    /// Returns true if the last step is clipped to end on the final time.
    #[must_use]
    pub fn land_on_final_time(&self) -> bool {
        self.land_on_final_time
    }

    /// Returns the limit on steps taken between resets.
    #[must_use]
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn step_sizes() {
        let range = TimeRange::new(0.0, 2.0).unwrap();

        assert_relative_eq!(IntegrationControl::None.step_size(&range, 1.5), 1.5);

        let fixed = IntegrationControl::Simple(SimpleControl::FixedDt(0.3));
        assert_relative_eq!(fixed.step_size(&range, 0.1), 0.3);

        let steps = IntegrationControl::Simple(SimpleControl::FixedSteps(8));
        assert_relative_eq!(steps.step_size(&range, 2.0), 0.25);

        let bounded = IntegrationControl::Simple(SimpleControl::Variable { max_dt: Some(0.4) });
        assert_relative_eq!(bounded.step_size(&range, 2.0), 0.4);
        assert_relative_eq!(bounded.step_size(&range, 0.1), 0.1);

        let unbounded = IntegrationControl::Simple(SimpleControl::Variable { max_dt: None });
        assert_relative_eq!(unbounded.step_size(&range, 2.0), 2.0);
    }

    #[test]
    fn rejects_bad_controls() {
        let simple = |control| Config::new(IntegrationControl::Simple(control), true, 10);

        assert_eq!(
            simple(SimpleControl::FixedDt(0.0)),
            Err(ConfigError::StepSize(0.0))
        );
        assert!(simple(SimpleControl::FixedDt(f64::INFINITY)).is_err());
        assert_eq!(simple(SimpleControl::FixedSteps(0)), Err(ConfigError::NumSteps));
        assert_eq!(
            simple(SimpleControl::Variable { max_dt: Some(-1.0) }),
            Err(ConfigError::MaxDt(-1.0))
        );
        assert_eq!(
            Config::new(IntegrationControl::None, true, 0),
            Err(ConfigError::MaxSteps)
        );
    }

    #[test]
    fn fixed_dt_uses_defaults() {
        let config = Config::fixed_dt(0.5).unwrap();
        assert!(config.land_on_final_time());
        assert_eq!(config.max_steps(), 10_000);
        assert_eq!(
            config.control(),
            IntegrationControl::Simple(SimpleControl::FixedDt(0.5))
        );
    }
}
