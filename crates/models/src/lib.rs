//! Reference ODE models for testing steppers, integrators, and adjoints.
//!
//! - [`VanDerPol`] — the nonlinear Van der Pol oscillator
//! - [`SinCos`] — a linear oscillator with a closed-form solution
//!
//! Both models can present themselves in explicit (`ẋ = f(x, t)`) or
//! implicit (`ẋ - f(x, t) = 0`) form, and can read their coefficients from
//! the parameter vector `p` instead of their own configuration.

mod sin_cos;
mod van_der_pol;

pub use sin_cos::SinCos;
pub use van_der_pol::VanDerPol;

use marcher_core::params::ParamError;
use thiserror::Error;

/// Errors that can occur when configuring a model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error("coefficient `{name}` must be finite and non-zero, got {value}")]
    Coefficient { name: &'static str, value: f64 },

    #[error("`{name}` must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
}

const IMPLICIT: &str = "Implicit model formulation";
const ACCEPT_PARAMS: &str = "Accept model parameters";
const IC_X0: &str = "IC x_0";
const IC_X1: &str = "IC x_1";
const IC_T0: &str = "IC t_0";

fn finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { name, value })
    }
}

fn nonzero(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value != 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Coefficient { name, value })
    }
}
