use crate::{DMatrix, DVector, InArgs};

/// How a [`Model`] states its differential equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formulation {
    /// The model returns the right-hand side `f(x, t)` of `ẋ = f(x, t)`.
    Explicit,

    /// The model returns the residual `F(ẋ, x, t)` of `F(ẋ, x, t) = 0`.
    Implicit,
}

/// Coefficients of the iteration matrix `W = alpha ∂F/∂ẋ + beta ∂F/∂x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WCoeffs {
    pub alpha: f64,
    pub beta: f64,
}

impl WCoeffs {
    /// Coefficients that select `∂F/∂ẋ`.
    pub const X_DOT: Self = Self {
        alpha: 1.0,
        beta: 0.0,
    };

    /// Coefficients that select `∂F/∂x`.
    pub const X: Self = Self {
        alpha: 0.0,
        beta: 1.0,
    };

    /// Creates a new pair of Jacobian coefficients.
    #[must_use]
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }
}

/// An ordinary differential equation model.
///
/// Models must be deterministic, always producing the same result for the
/// same arguments, which lets steppers re-evaluate them freely during
/// nonlinear iterations and lets the adjoint re-linearize them along a
/// stored forward trajectory.
///
/// # Formulations
///
/// For [`Formulation::Implicit`] models, [`Model::residual`] returns
/// `F(ẋ, x, t, p)` and [`Model::jacobian`] returns
/// `alpha ∂F/∂ẋ + beta ∂F/∂x`.
///
/// For [`Formulation::Explicit`] models, [`Model::residual`] returns
/// `f(x, t, p)` (the value of `ẋ`), ignores `args.x_dot`, and
/// [`Model::jacobian`] returns `beta ∂f/∂x`; `alpha` is unused.
pub trait Model {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the number of state variables.
    fn dim(&self) -> usize;

    /// Returns how the model states its equations.
    fn formulation(&self) -> Formulation;

    /// Returns the model's nominal values, which double as its default
    /// initial condition.
    fn nominal_values(&self) -> InArgs;

    /// Evaluates the residual (implicit) or right-hand side (explicit).
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if a required argument is missing, has the
    /// wrong dimension, or the model cannot be evaluated.
    fn residual(&self, args: &InArgs) -> Result<DVector, Self::Error>;

    /// Evaluates the iteration matrix `W` for the given coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if a required argument is missing, has the
    /// wrong dimension, or the model cannot be evaluated.
    fn jacobian(&self, args: &InArgs, coeffs: WCoeffs) -> Result<DMatrix, Self::Error>;
}
