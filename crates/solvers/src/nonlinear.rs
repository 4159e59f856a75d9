//! Solvers for the nonlinear equations produced by implicit time steps.
//!
//! A [`NonlinearProblem`] exposes a residual `r(x)` and its Jacobian
//! `∂r/∂x`. A [`NonlinearSolver`] drives the residual toward zero from an
//! initial guess. Implicit steppers are generic over the solver, so the same
//! stepper can run with a full Newton iteration on a nonlinear model or with
//! a single linear solve on a model that is linear in its state.
//!
//! # Solvers
//!
//! - [`newton`] — undamped Newton iteration with a rate-based convergence test
//! - [`linear`] — one Newton step, exact for problems linear in `x`

mod error;
mod solution;

pub mod linear;
pub mod newton;

pub use error::Error;
pub use solution::{Solution, Status};

use marcher_core::{DMatrix, DVector};

/// A system of equations `r(x) = 0` with a computable Jacobian.
pub trait NonlinearProblem {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Evaluates the residual at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the residual cannot be evaluated.
    fn residual(&self, x: &DVector) -> Result<DVector, Self::Error>;

    /// Evaluates the Jacobian `∂r/∂x` at `x`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the Jacobian cannot be evaluated.
    fn jacobian(&self, x: &DVector) -> Result<DMatrix, Self::Error>;
}

/// A solver for [`NonlinearProblem`]s.
pub trait NonlinearSolver {
    /// Solves `r(x) = 0` starting from `guess`.
    ///
    /// A returned solution may be unconverged; check
    /// [`Solution::is_converged`].
    ///
    /// # Errors
    ///
    /// Returns an error if the problem fails to evaluate, the residual is
    /// non-finite, or the Jacobian is singular.
    fn solve<P: NonlinearProblem>(&self, problem: &P, guess: DVector) -> Result<Solution, Error>;
}

/// The residual norm at `x` and the Newton update `dx` solving `J dx = -r`.
pub(crate) struct NewtonStep {
    pub residual_norm: f64,
    pub dx: DVector,
}

/// Computes one Newton update for `problem` at `x`.
pub(crate) fn newton_step<P: NonlinearProblem>(
    problem: &P,
    x: &DVector,
    iter: usize,
) -> Result<NewtonStep, Error> {
    let residual = problem.residual(x).map_err(Error::problem)?;
    if residual.iter().any(|r| !r.is_finite()) {
        return Err(Error::NonFiniteResidual { iter });
    }

    let jacobian = problem.jacobian(x).map_err(Error::problem)?;
    let dx = jacobian
        .lu()
        .solve(&(-&residual))
        .ok_or(Error::SingularJacobian { iter })?;

    Ok(NewtonStep {
        residual_norm: residual.norm(),
        dx,
    })
}
