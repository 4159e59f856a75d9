//! Time integration for Marcher models.
//!
//! - [`nonlinear`] — Newton and single-step linear solvers for the implicit
//!   equations a time step produces
//! - [`stepper`] — Backward Euler, Forward Euler, and classic RK4 steppers
//! - [`buffer`] — interpolation buffers holding a trajectory's history
//! - [`integrator`] — drives a stepper over a time range under an
//!   integration control strategy
//! - [`builder`] — builds integrators from a
//!   [`ParameterList`](marcher_core::params::ParameterList)
//! - [`adjoint`] — the adjoint of a model linearized along a stored forward
//!   solution, integrated in reversed time

pub mod adjoint;
pub mod buffer;
pub mod builder;
pub mod integrator;
pub mod nonlinear;
pub mod stepper;

mod implicit;
