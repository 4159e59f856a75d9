use crate::{DVector, InArgs};

/// A captured node of a trajectory: time, state, and state derivative.
#[derive(Debug, Clone, PartialEq)]
pub struct StatePoint {
    pub t: f64,
    pub x: DVector,
    pub x_dot: DVector,
}

impl StatePoint {
    /// Creates a new state point.
    pub fn new(t: f64, x: DVector, x_dot: DVector) -> Self {
        Self { t, x, x_dot }
    }

    /// Converts the point into model arguments, attaching parameters `p`.
    #[must_use]
    pub fn to_args(&self, p: Option<&DVector>) -> InArgs {
        InArgs {
            t: self.t,
            x: Some(self.x.clone()),
            x_dot: Some(self.x_dot.clone()),
            p: p.cloned(),
        }
    }
}
