use marcher_core::TimeRangeError;
use thiserror::Error;

use crate::{buffer, stepper};

/// Errors that can occur while integrating.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Stepper(#[from] stepper::Error),

    #[error(transparent)]
    Buffer(#[from] buffer::Error),

    #[error("invalid time range: {0}")]
    TimeRange(#[from] TimeRangeError),

    #[error("time {t} is outside the integration range [{lower}, {upper}]")]
    OutOfRange { t: f64, lower: f64, upper: f64 },

    #[error("the state at t = {t} is no longer stored")]
    Unavailable { t: f64 },

    #[error("exceeded the limit of {max_steps} time steps at t = {t}")]
    MaxStepsExceeded { max_steps: usize, t: f64 },
}
