//! Single-step solver for problems that are linear in the unknown.
//!
//! For `r(x) = A x - b`, one Newton step from any guess lands on the exact
//! solution `x = guess - A⁻¹ r(guess)`. The adjoint of a model is linear in
//! the adjoint variable, so adjoint time steps use this solver instead of a
//! Newton iteration.

use marcher_core::DVector;

use super::{Error, NonlinearProblem, NonlinearSolver, Solution, Status, newton_step};

/// Solves a linear problem with one Newton step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Solver;

impl Solver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl NonlinearSolver for Solver {
    fn solve<P: NonlinearProblem>(&self, problem: &P, guess: DVector) -> Result<Solution, Error> {
        let step = newton_step(problem, &guess, 1)?;
        let update_norm = step.dx.norm();

        Ok(Solution {
            status: Status::Converged,
            x: guess + step.dx,
            iters: 1,
            update_norm,
        })
    }
}
