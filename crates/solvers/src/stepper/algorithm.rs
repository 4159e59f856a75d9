use std::fmt;

/// The time-stepping method a [`Stepper`](super::Stepper) applies.
///
/// The algorithm is a plain value, separate from any model, so it can be
/// taken from one stepper and reused to build another, as the adjoint does
/// with the forward stepper's method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepperAlgorithm {
    /// First-order implicit Euler; solves a nonlinear system per step.
    BackwardEuler,

    /// First-order explicit Euler.
    ForwardEuler,

    /// Classic fourth-order explicit Runge–Kutta.
    ExplicitRk4,
}

impl StepperAlgorithm {
    /// Every algorithm, in the order of [`StepperAlgorithm::NAMES`].
    pub const ALL: [Self; 3] = [Self::BackwardEuler, Self::ForwardEuler, Self::ExplicitRk4];

    /// Configuration names accepted by [`StepperAlgorithm::from_name`].
    pub const NAMES: [&'static str; 3] = ["Backward Euler", "Forward Euler", "Explicit RK"];

    /// Returns the configuration name of the algorithm.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::BackwardEuler => Self::NAMES[0],
            Self::ForwardEuler => Self::NAMES[1],
            Self::ExplicitRk4 => Self::NAMES[2],
        }
    }

    /// Looks up an algorithm by configuration name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|algorithm| algorithm.name() == name)
    }

    /// Returns true if the algorithm solves an implicit system each step.
    #[must_use]
    pub fn is_implicit(self) -> bool {
        matches!(self, Self::BackwardEuler)
    }
}

impl fmt::Display for StepperAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for algorithm in StepperAlgorithm::ALL {
            assert_eq!(StepperAlgorithm::from_name(algorithm.name()), Some(algorithm));
        }
        assert_eq!(StepperAlgorithm::from_name("Implicit BDF"), None);
    }
}
