use marcher_core::{DMatrix, DVector, Model, StatePoint, WCoeffs};

use crate::{
    implicit,
    nonlinear::{NonlinearProblem, NonlinearSolver},
};

use super::Error;

/// The implicit system `F((x - x_n)/dt, x, t_{n+1}) = 0` for one step.
struct StepProblem<'a, M> {
    model: &'a M,
    p: Option<&'a DVector>,
    x_prev: &'a DVector,
    t: f64,
    dt: f64,
}

impl<M: Model> StepProblem<'_, M> {
    fn point(&self, x: &DVector) -> StatePoint {
        StatePoint::new(self.t, x.clone(), (x - self.x_prev) / self.dt)
    }
}

impl<M: Model> NonlinearProblem for StepProblem<'_, M> {
    type Error = M::Error;

    fn residual(&self, x: &DVector) -> Result<DVector, Self::Error> {
        implicit::residual(self.model, &self.point(x), self.p)
    }

    fn jacobian(&self, x: &DVector) -> Result<DMatrix, Self::Error> {
        let coeffs = WCoeffs::new(1.0 / self.dt, 1.0);
        implicit::jacobian(self.model, &self.point(x), self.p, coeffs)
    }
}

/// Advances `current` to time `t`, a step of `dt`, using the previous state
/// as the initial guess.
pub(super) fn step<M: Model, S: NonlinearSolver>(
    model: &M,
    solver: &S,
    p: Option<&DVector>,
    current: &StatePoint,
    t: f64,
    dt: f64,
) -> Result<StatePoint, Error> {
    let problem = StepProblem {
        model,
        p,
        x_prev: &current.x,
        t,
        dt,
    };

    let solution = solver
        .solve(&problem, current.x.clone())
        .map_err(|source| Error::Solve { t, source })?;
    if !solution.is_converged() {
        return Err(Error::NotConverged {
            t,
            iters: solution.iters,
        });
    }

    let x_dot = (&solution.x - &current.x) / dt;
    Ok(StatePoint::new(t, solution.x, x_dot))
}
