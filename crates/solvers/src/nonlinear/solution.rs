use marcher_core::DVector;

/// Indicates how a nonlinear solve terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Converged according to the configured tolerance.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of a nonlinear solve.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the solver terminated.
    pub status: Status,

    /// The final iterate.
    pub x: DVector,

    /// Number of iterations performed.
    pub iters: usize,

    /// Norm of the last update applied to `x`.
    pub update_norm: f64,
}

impl Solution {
    /// Returns true if the solve converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }
}
