//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, enabling
//! observers to work generically across the Newton solver and the integrator.
//!
//! # Event traits
//!
//! - [`HasTime`] — events that carry a simulation time
//! - [`HasResidualNorm`] — events that carry a residual norm
//!
//! # Action traits
//!
//! - [`CanStopEarly`] — actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use marcher_core::Observer;
//! use marcher_observers::traits::{CanStopEarly, HasResidualNorm};
//!
//! struct GoodEnough {
//!     tolerance: f64,
//!     min_iters: usize,
//!     iter: usize,
//! }
//!
//! impl<E: HasResidualNorm, A: CanStopEarly> Observer<E, A> for GoodEnough {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         self.iter += 1;
//!         if self.iter >= self.min_iters && event.residual_norm() < self.tolerance {
//!             return Some(A::stop_early());
//!         }
//!         None
//!     }
//! }
//! ```

use marcher_solvers::{integrator, nonlinear::newton};

/// An event that carries a simulation time.
pub trait HasTime {
    /// Returns the time of the state this event reports.
    fn time(&self) -> f64;
}

/// An event that carries a residual norm.
pub trait HasResidualNorm {
    /// Returns the residual norm for this event.
    fn residual_norm(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

impl HasTime for integrator::Event {
    fn time(&self) -> f64 {
        self.point.t
    }
}

impl HasResidualNorm for newton::Event {
    fn residual_norm(&self) -> f64 {
        self.residual_norm
    }
}

impl CanStopEarly for integrator::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanStopEarly for newton::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
