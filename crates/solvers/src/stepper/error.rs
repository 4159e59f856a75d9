use std::error::Error as StdError;

use marcher_core::ArgError;

use crate::nonlinear;

use super::StepperAlgorithm;

/// Errors that can occur while setting up or taking a time step.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("model error: {0}")]
    Model(#[source] Box<dyn StdError + Send + Sync>),

    #[error("invalid initial condition: {0}")]
    InitialCondition(#[from] ArgError),

    #[error("the {algorithm} stepper requires an explicit model")]
    RequiresExplicitModel { algorithm: StepperAlgorithm },

    #[error("step size must be finite and positive, got {dt}")]
    InvalidStepSize { dt: f64 },

    #[error("nonlinear solve failed for the step to t = {t}")]
    Solve {
        t: f64,
        #[source]
        source: nonlinear::Error,
    },

    #[error("nonlinear solve did not converge for the step to t = {t} after {iters} iterations")]
    NotConverged { t: f64, iters: usize },
}

impl Error {
    pub(crate) fn model<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self::Model(Box::new(err))
    }
}
