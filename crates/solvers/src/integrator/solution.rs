use marcher_core::StatePoint;

/// Indicates how an integration terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reached the final time.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of [`Integrator::integrate`](super::Integrator::integrate).
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the integration terminated.
    pub status: Status,

    /// The last accepted state.
    pub point: StatePoint,

    /// Total number of steps taken since the integrator was reset.
    pub steps: usize,
}
