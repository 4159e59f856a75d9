use marcher_core::Observer;

use crate::traits::{CanStopEarly, HasResidualNorm, HasTime};

/// Stops a solve once an event reaches time `t_stop`.
///
/// Works with any event implementing [`HasTime`], such as
/// [`integrator::Event`](marcher_solvers::integrator::Event).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopAtTime {
    pub t_stop: f64,
}

impl<E: HasTime, A: CanStopEarly> Observer<E, A> for StopAtTime {
    fn observe(&mut self, event: &E) -> Option<A> {
        (event.time() >= self.t_stop).then(A::stop_early)
    }
}

/// Stops a solve once the residual norm drops below `tolerance`.
///
/// Events with a NaN residual norm never trigger a stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopBelowResidual {
    pub tolerance: f64,
}

impl<E: HasResidualNorm, A: CanStopEarly> Observer<E, A> for StopBelowResidual {
    fn observe(&mut self, event: &E) -> Option<A> {
        (event.residual_norm() < self.tolerance).then(A::stop_early)
    }
}
