//! Newton iteration for implicit time steps.
//!
//! # Algorithm
//!
//! Starting from the guess `x₀`, each iteration solves `J(xₖ) dx = -r(xₖ)`
//! and sets `xₖ₊₁ = xₖ + dx`. The solve is declared converged when either
//!
//! - the update norm `‖dx‖` is at most the tolerance, or
//! - after the first iteration, the convergence rate `R = ‖dx‖ / ‖dx_prev‖`
//!   is below one and the estimated remaining error `R / (1 - R) ‖dx‖` is at
//!   most the tolerance.
//!
//! The rate-based estimate lets a quadratically converging iteration stop one
//! step earlier than the plain update test would.
//!
//! # Configuration
//!
//! [`Config`] reads `Default Tol` (double, default `1e-2`) and
//! `Default Max Iters` (int, default `3`) from a parameter list.
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] per iteration. Observers can return
//! [`Action::StopEarly`] to halt immediately with the current iterate.

mod action;
mod config;
mod event;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use event::Event;

use marcher_core::{DVector, Observer, params::ParameterList};

use super::{Error, NewtonStep, NonlinearProblem, NonlinearSolver, Solution, Status, newton_step};

/// Solves a nonlinear problem with Newton's method.
///
/// # Errors
///
/// Returns an error if the problem fails to evaluate, the residual is
/// non-finite, or the Jacobian is singular.
pub fn solve<P, Obs>(
    problem: &P,
    guess: DVector,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    P: NonlinearProblem,
    Obs: Observer<Event, Action>,
{
    let tol = config.tol();
    let mut x = guess;
    let mut last_norm: Option<f64> = None;

    for iter in 1..=config.max_iters() {
        let NewtonStep { residual_norm, dx } = newton_step(problem, &x, iter)?;
        x += &dx;

        let update_norm = dx.norm();
        let rate = last_norm
            .filter(|&last| last > 0.0)
            .map(|last| update_norm / last);
        let converged = update_norm <= tol
            || rate.is_some_and(|rate| rate < 1.0 && rate / (1.0 - rate) * update_norm <= tol);

        let event = Event {
            iter,
            residual_norm,
            update_norm,
            rate,
            converged,
        };

        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(Solution {
                status: Status::StoppedByObserver,
                x,
                iters: iter,
                update_norm,
            });
        }

        if converged {
            return Ok(Solution {
                status: Status::Converged,
                x,
                iters: iter,
                update_norm,
            });
        }

        last_norm = Some(update_norm);
    }

    Ok(Solution {
        status: Status::MaxIters,
        x,
        iters: config.max_iters(),
        update_norm: last_norm.unwrap_or(f64::NAN),
    })
}

/// Solves a nonlinear problem with Newton's method without observation.
///
/// # Errors
///
/// Returns an error if the problem fails to evaluate, the residual is
/// non-finite, or the Jacobian is singular.
pub fn solve_unobserved<P: NonlinearProblem>(
    problem: &P,
    guess: DVector,
    config: &Config,
) -> Result<Solution, Error> {
    solve(problem, guess, config, ())
}

/// A Newton solver with a fixed configuration, usable by implicit steppers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Solver {
    config: Config,
}

impl Solver {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Creates a solver from a parameter list.
    ///
    /// # Errors
    ///
    /// Returns an error if the list holds unknown names, wrongly typed
    /// values, or invalid tolerances.
    pub fn from_parameter_list(list: &ParameterList) -> Result<Self, ConfigError> {
        Config::from_parameter_list(list).map(Self::new)
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl NonlinearSolver for Solver {
    fn solve<P: NonlinearProblem>(&self, problem: &P, guess: DVector) -> Result<Solution, Error> {
        solve_unobserved(problem, guess, &self.config)
    }
}
