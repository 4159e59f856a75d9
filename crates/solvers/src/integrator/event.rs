use marcher_core::StatePoint;

/// Event emitted by the integrator for each accepted state.
///
/// Step 0 is the initial state, emitted with `dt = 0`.
/// Steps 1..N follow each accepted time step.
#[derive(Debug, Clone)]
pub struct Event {
    /// The step number (0 for the initial state).
    pub step: usize,

    /// Size of the step that produced `point`.
    pub dt: f64,

    /// The accepted state.
    pub point: StatePoint,
}
