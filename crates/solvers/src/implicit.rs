//! Uniform implicit view of a model, whatever its formulation.
//!
//! Steppers and the adjoint work with `F(ẋ, x, t) = 0`. Explicit models
//! `ẋ = f(x, t)` are viewed as `F = ẋ - f`, so `∂F/∂ẋ = I` and
//! `∂F/∂x = -∂f/∂x`.

use marcher_core::{DMatrix, DVector, Formulation, Model, StatePoint, WCoeffs};

/// Evaluates `F(ẋ, x, t)` at a state point.
pub(crate) fn residual<M: Model>(
    model: &M,
    point: &StatePoint,
    p: Option<&DVector>,
) -> Result<DVector, M::Error> {
    let args = point.to_args(p);
    match model.formulation() {
        Formulation::Implicit => model.residual(&args),
        Formulation::Explicit => Ok(&point.x_dot - model.residual(&args)?),
    }
}

/// Evaluates `alpha ∂F/∂ẋ + beta ∂F/∂x` at a state point.
pub(crate) fn jacobian<M: Model>(
    model: &M,
    point: &StatePoint,
    p: Option<&DVector>,
    coeffs: WCoeffs,
) -> Result<DMatrix, M::Error> {
    let args = point.to_args(p);
    match model.formulation() {
        Formulation::Implicit => model.jacobian(&args, coeffs),
        Formulation::Explicit => {
            let n = model.dim();
            let df_dx = model.jacobian(&args, WCoeffs::X)?;
            Ok(DMatrix::identity(n, n) * coeffs.alpha - df_dx * coeffs.beta)
        }
    }
}
