//! Discrete adjoint of a model along a stored forward solution.
//!
//! For a forward model `F(ẋ, x, t) = 0` solved over `[t₀, t_f]`, the
//! [`AdjointModel`] is the implicit model
//!
//! ```text
//! F̄(λ̇, λ, τ) = (∂F/∂ẋ)ᵀ λ̇ + (∂F/∂x)ᵀ λ = 0
//! ```
//!
//! in reversed time `τ = t_f - t`, so integrating the adjoint forward in `τ`
//! over `[0, t_f - t₀]` runs backward along the forward trajectory. Both
//! Jacobians are evaluated at the forward state `x(t_f - τ)`, interpolated
//! from a copy of the forward integrator's trailing buffer.
//!
//! The adjoint is linear in `λ`, so its time steps can use
//! [`linear::Solver`](crate::nonlinear::linear::Solver).

use std::error::Error as StdError;

use marcher_core::{
    ArgError, DMatrix, DVector, Formulation, InArgs, Model, StatePoint, TimeRange, WCoeffs,
};
use thiserror::Error;

use crate::{buffer, buffer::InterpolationBuffer, implicit, integrator::Integrator};

/// Errors that can occur when evaluating an adjoint model.
#[derive(Debug, Error)]
pub enum Error {
    #[error("the forward state solution has not been set")]
    MissingForwardSolution,

    #[error("the forward integrator does not keep a trailing buffer")]
    NoTrailingBuffer,

    #[error("forward state lookup failed: {0}")]
    Buffer(#[from] buffer::Error),

    #[error(transparent)]
    Args(#[from] ArgError),

    #[error("forward model error: {0}")]
    Model(#[source] Box<dyn StdError + Send + Sync>),
}

/// The adjoint of a forward model, in reversed time.
#[derive(Debug, Clone)]
pub struct AdjointModel<M> {
    model: M,
    fwd_range: TimeRange,
    fwd_states: Option<InterpolationBuffer>,
    fwd_p: Option<DVector>,
}

impl<M: Model> AdjointModel<M> {
    /// Creates the adjoint of `model` over the forward time range.
    ///
    /// The forward solution must be set with
    /// [`AdjointModel::set_fwd_state_solution_buffer`] before evaluation.
    pub fn new(model: M, fwd_range: TimeRange) -> Self {
        Self {
            model,
            fwd_range,
            fwd_states: None,
            fwd_p: None,
        }
    }

    /// Copies the forward solution from an integrator's trailing buffer,
    /// along with the parameters its model was evaluated with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoTrailingBuffer`] if the integrator keeps no
    /// trailing buffer.
    pub fn set_fwd_state_solution_buffer<N, S>(
        &mut self,
        integrator: &Integrator<N, S>,
    ) -> Result<(), Error> {
        let buffer = integrator.trailing_buffer().ok_or(Error::NoTrailingBuffer)?;
        self.fwd_states = Some(buffer.clone());
        self.fwd_p = integrator.stepper().parameters().cloned();
        Ok(())
    }

    pub fn fwd_time_range(&self) -> TimeRange {
        self.fwd_range
    }

    pub fn fwd_model(&self) -> &M {
        &self.model
    }

    /// Returns the forward state at reversed time `tau`.
    ///
    /// # Errors
    ///
    /// Returns an error if the forward solution is unset or does not cover
    /// `t_f - tau`.
    pub fn fwd_state(&self, tau: f64) -> Result<StatePoint, Error> {
        let states = self
            .fwd_states
            .as_ref()
            .ok_or(Error::MissingForwardSolution)?;

        let (lower, upper) = (self.fwd_range.lower(), self.fwd_range.upper());
        let eps = 1e-12 * upper.abs().max(lower.abs()).max(1.0);
        let t = match upper - tau {
            t if (t - lower).abs() <= eps => lower,
            t if (t - upper).abs() <= eps => upper,
            t => t,
        };
        Ok(states.interpolate(t)?)
    }

    /// Returns `(∂F/∂ẋ, ∂F/∂x)` at the forward state for reversed time `tau`.
    fn fwd_jacobians(&self, tau: f64) -> Result<(DMatrix, DMatrix), Error> {
        let point = self.fwd_state(tau)?;
        let p = self.fwd_p.as_ref();
        let jacobian = |coeffs| {
            implicit::jacobian(&self.model, &point, p, coeffs)
                .map_err(|err| Error::Model(Box::new(err)))
        };
        Ok((jacobian(WCoeffs::X_DOT)?, jacobian(WCoeffs::X)?))
    }
}

impl<M: Model> Model for AdjointModel<M> {
    type Error = Error;

    fn dim(&self) -> usize {
        self.model.dim()
    }

    fn formulation(&self) -> Formulation {
        Formulation::Implicit
    }

    /// Reversed time zero with zero `λ` and `λ̇`.
    fn nominal_values(&self) -> InArgs {
        let n = self.dim();
        InArgs::at(0.0)
            .with_x(DVector::zeros(n))
            .with_x_dot(DVector::zeros(n))
    }

    fn residual(&self, args: &InArgs) -> Result<DVector, Error> {
        let n = self.dim();
        let lambda = args.require_x(n)?;
        let lambda_dot = args.require_x_dot(n)?;

        let (df_dx_dot, df_dx) = self.fwd_jacobians(args.t)?;
        Ok(df_dx_dot.tr_mul(lambda_dot) + df_dx.tr_mul(lambda))
    }

    fn jacobian(&self, args: &InArgs, coeffs: WCoeffs) -> Result<DMatrix, Error> {
        let (df_dx_dot, df_dx) = self.fwd_jacobians(args.t)?;
        Ok(df_dx_dot.transpose() * coeffs.alpha + df_dx.transpose() * coeffs.beta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{
        buffer::Interpolator,
        integrator::Config,
        nonlinear::linear,
        stepper::{Stepper, StepperAlgorithm},
    };

    // --- Test fixtures ---

    /// Linear system `ẋ = A x` with `A = [[0, 1], [-4, -1]]`.
    #[derive(Debug, Clone)]
    struct Linear;

    impl Linear {
        fn a() -> DMatrix {
            DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -4.0, -1.0])
        }
    }

    impl Model for Linear {
        type Error = ArgError;

        fn dim(&self) -> usize {
            2
        }

        fn formulation(&self) -> Formulation {
            Formulation::Explicit
        }

        fn nominal_values(&self) -> InArgs {
            InArgs::at(0.0).with_x(DVector::from_vec(vec![1.0, 0.0]))
        }

        fn residual(&self, args: &InArgs) -> Result<DVector, ArgError> {
            Ok(Self::a() * args.require_x(2)?)
        }

        fn jacobian(&self, _args: &InArgs, coeffs: WCoeffs) -> Result<DMatrix, ArgError> {
            Ok(Self::a() * coeffs.beta)
        }
    }

    fn forward(trailing: bool) -> Integrator<Linear, linear::Solver> {
        let ic = Linear.nominal_values();
        let stepper =
            Stepper::new(StepperAlgorithm::BackwardEuler, Linear, linear::Solver, &ic).unwrap();
        let buffer = trailing.then(|| InterpolationBuffer::new(Interpolator::Linear, None));
        let mut integrator =
            Integrator::new(stepper, 1.0, Config::fixed_dt(0.25).unwrap(), buffer).unwrap();
        integrator.integrate_unobserved().unwrap();
        integrator
    }

    fn adjoint() -> AdjointModel<Linear> {
        let fwd = forward(true);
        let mut adjoint = AdjointModel::new(Linear, fwd.fwd_time_range());
        adjoint.set_fwd_state_solution_buffer(&fwd).unwrap();
        adjoint
    }

    // --- Tests ---

    #[test]
    fn residual_is_transposed_linearization() {
        let adjoint = adjoint();
        let lambda = DVector::from_vec(vec![1.0, 2.0]);
        let lambda_dot = DVector::from_vec(vec![0.5, -1.0]);
        let args = InArgs::at(0.3)
            .with_x(lambda.clone())
            .with_x_dot(lambda_dot.clone());

        // F = ẋ - A x, so F̄ = λ̇ - Aᵀ λ.
        let expected = &lambda_dot - Linear::a().transpose() * &lambda;
        let residual = adjoint.residual(&args).unwrap();
        assert_relative_eq!(residual, expected, epsilon = 1e-14);
    }

    #[test]
    fn jacobian_combines_transposes() {
        let adjoint = adjoint();
        let args = adjoint.nominal_values();

        let w = adjoint.jacobian(&args, WCoeffs::new(4.0, 1.0)).unwrap();
        let expected = DMatrix::identity(2, 2) * 4.0 - Linear::a().transpose();
        assert_relative_eq!(w, expected, epsilon = 1e-14);
    }

    #[test]
    fn nominal_values_are_zero_at_reversed_start() {
        let adjoint = AdjointModel::new(Linear, TimeRange::new(0.0, 1.0).unwrap());
        let nominal = adjoint.nominal_values();
        assert_eq!(nominal.t, 0.0);
        assert_eq!(nominal.x, Some(DVector::zeros(2)));
        assert_eq!(nominal.x_dot, Some(DVector::zeros(2)));
        assert_eq!(adjoint.formulation(), Formulation::Implicit);
    }

    #[test]
    fn reversed_time_maps_to_forward_state() {
        let fwd = forward(true);
        let adjoint = adjoint();
        let buffer = fwd.trailing_buffer().unwrap();

        assert_eq!(adjoint.fwd_state(0.0).unwrap(), *buffer.last().unwrap());
        assert_eq!(adjoint.fwd_state(1.0).unwrap(), *buffer.first().unwrap());
        assert_eq!(adjoint.fwd_state(0.25).unwrap(), buffer.interpolate(0.75).unwrap());
        assert!(matches!(
            adjoint.fwd_state(1.5),
            Err(Error::Buffer(buffer::Error::OutOfRange { .. }))
        ));
    }

    #[test]
    fn requires_forward_solution() {
        let mut adjoint = AdjointModel::new(Linear, TimeRange::new(0.0, 1.0).unwrap());
        let args = adjoint.nominal_values();
        assert!(matches!(
            adjoint.residual(&args),
            Err(Error::MissingForwardSolution)
        ));

        let fwd = forward(false);
        assert!(matches!(
            adjoint.set_fwd_state_solution_buffer(&fwd),
            Err(Error::NoTrailingBuffer)
        ));
    }
}
