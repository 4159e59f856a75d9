/// Event emitted by the Newton solver after each iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Iteration counter (1-based).
    pub iter: usize,

    /// Norm of the residual before the update.
    pub residual_norm: f64,

    /// Norm of the update applied in this iteration.
    pub update_norm: f64,

    /// Ratio of this update norm to the previous one, if there was one.
    pub rate: Option<f64>,

    /// Whether this iteration satisfied the convergence test.
    pub converged: bool,
}
