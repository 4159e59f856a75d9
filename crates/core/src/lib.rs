//! Core traits and types for the Marcher framework.
//!
//! This crate defines the shared abstractions that steppers, integrators,
//! observers, and models build on:
//!
//! - [`Model`] — an ODE model in implicit (`F(ẋ, x, t) = 0`) or explicit
//!   (`ẋ = f(x, t)`) form, with residual and Jacobian evaluation
//! - [`InArgs`] — the named argument bundle (`t`, `x`, `ẋ`, `p`) passed to models
//! - [`StatePoint`] — a captured `(t, x, ẋ)` node of a trajectory
//! - [`TimeRange`] — a closed time interval
//! - [`Observer`] — receives solver events and optionally returns control actions
//! - [`params::ParameterList`] — nested, serde-readable configuration
//! - [`compare`] — the tolerant element-wise comparison used as a test oracle

mod args;
mod model;
mod observer;
mod point;
mod time;

pub mod compare;
pub mod params;

pub use args::{ArgError, InArgs};
pub use model::{Formulation, Model, WCoeffs};
pub use observer::Observer;
pub use point::StatePoint;
pub use time::{TimeRange, TimeRangeError};

/// Dense column vector used for model states.
pub type DVector = nalgebra::DVector<f64>;

/// Dense matrix used for model Jacobians.
pub type DMatrix = nalgebra::DMatrix<f64>;
