//! Single-step time integration methods.
//!
//! A [`Stepper`] owns a model, a nonlinear solver, and the current
//! [`StatePoint`]. Each call to [`Stepper::take_step`] advances the state by
//! one step using the configured [`StepperAlgorithm`].

mod algorithm;
mod backward_euler;
mod error;
mod explicit;

pub use algorithm::StepperAlgorithm;
pub use error::Error;

use marcher_core::{DVector, Formulation, InArgs, Model, StatePoint};

use crate::nonlinear::NonlinearSolver;

/// Advances a model's state one step at a time.
///
/// Implicit algorithms use the solver `S` each step; explicit algorithms
/// never call it.
#[derive(Debug, Clone)]
pub struct Stepper<M, S> {
    algorithm: StepperAlgorithm,
    model: M,
    solver: S,
    p: Option<DVector>,
    current: StatePoint,
}

impl<M: Model, S: NonlinearSolver> Stepper<M, S> {
    /// Creates a stepper positioned at the initial condition `ic`.
    ///
    /// Parameters come from `ic.p` when set, otherwise from the model's
    /// nominal values.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm cannot step this model's
    /// formulation, or if the initial condition is invalid.
    pub fn new(
        algorithm: StepperAlgorithm,
        model: M,
        solver: S,
        ic: &InArgs,
    ) -> Result<Self, Error> {
        check_compatible(algorithm, &model)?;
        let p = ic.p.clone().or_else(|| model.nominal_values().p);
        let current = initial_point(&model, ic, p.as_ref())?;

        Ok(Self {
            algorithm,
            model,
            solver,
            p,
            current,
        })
    }

    /// Resets the stepper's state to `ic`.
    ///
    /// A missing `ic.x_dot` is computed from the model for explicit
    /// formulations and set to zero for implicit ones.
    ///
    /// # Errors
    ///
    /// Returns an error if `ic.x` is missing, or if either vector has the
    /// wrong dimension. The stepper is left unchanged on error.
    pub fn set_initial_condition(&mut self, ic: &InArgs) -> Result<(), Error> {
        let p = ic.p.clone().or_else(|| self.p.clone());
        self.current = initial_point(&self.model, ic, p.as_ref())?;
        self.p = p;
        Ok(())
    }

    /// Switches to another algorithm, keeping the current state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequiresExplicitModel`] if the algorithm cannot step
    /// this model.
    pub fn set_algorithm(&mut self, algorithm: StepperAlgorithm) -> Result<(), Error> {
        check_compatible(algorithm, &self.model)?;
        self.algorithm = algorithm;
        Ok(())
    }

    /// Advances the state by `dt` and returns the new point.
    ///
    /// On error the state is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if `dt` is not finite and positive, the model fails
    /// to evaluate, or an implicit solve fails or does not converge.
    pub fn take_step(&mut self, dt: f64) -> Result<&StatePoint, Error> {
        self.advance(self.current.t + dt, dt)
    }

    /// Advances the state to exactly time `t`.
    ///
    /// Unlike `take_step(t - self.time())`, the new point's time is `t`
    /// itself, free of round-off in the sum.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Stepper::take_step`].
    pub fn take_step_to(&mut self, t: f64) -> Result<&StatePoint, Error> {
        self.advance(t, t - self.current.t)
    }

    fn advance(&mut self, t: f64, dt: f64) -> Result<&StatePoint, Error> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(Error::InvalidStepSize { dt });
        }

        let (model, p, current) = (&self.model, self.p.as_ref(), &self.current);
        let next = match self.algorithm {
            StepperAlgorithm::BackwardEuler => {
                backward_euler::step(model, &self.solver, p, current, t, dt)?
            }
            StepperAlgorithm::ForwardEuler => explicit::forward_euler(model, p, current, t, dt)?,
            StepperAlgorithm::ExplicitRk4 => explicit::rk4(model, p, current, t, dt)?,
        };

        self.current = next;
        Ok(&self.current)
    }
}

impl<M, S> Stepper<M, S> {
    /// Returns the stepper's algorithm.
    ///
    /// The algorithm carries no model state, so it can configure a stepper
    /// for a different model.
    pub fn algorithm(&self) -> StepperAlgorithm {
        self.algorithm
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Returns the parameter vector passed to the model, if any.
    pub fn parameters(&self) -> Option<&DVector> {
        self.p.as_ref()
    }

    /// Returns the most recent state point.
    pub fn current(&self) -> &StatePoint {
        &self.current
    }

    /// Returns the time of the most recent state point.
    pub fn time(&self) -> f64 {
        self.current.t
    }
}

fn check_compatible<M: Model>(algorithm: StepperAlgorithm, model: &M) -> Result<(), Error> {
    if !algorithm.is_implicit() && model.formulation() == Formulation::Implicit {
        return Err(Error::RequiresExplicitModel { algorithm });
    }
    Ok(())
}

fn initial_point<M: Model>(
    model: &M,
    ic: &InArgs,
    p: Option<&DVector>,
) -> Result<StatePoint, Error> {
    let dim = model.dim();
    let x = ic.require_x(dim)?.clone();
    let x_dot = if ic.x_dot.is_some() {
        ic.require_x_dot(dim)?.clone()
    } else {
        match model.formulation() {
            Formulation::Explicit => explicit::rhs(model, ic.t, &x, p)?,
            Formulation::Implicit => DVector::zeros(dim),
        }
    };
    Ok(StatePoint::new(ic.t, x, x_dot))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use marcher_core::{ArgError, DMatrix, WCoeffs};

    use crate::nonlinear::{linear, newton};

    // --- Test fixtures ---

    /// Exponential decay `ẋ = -k x`, in either formulation.
    struct Decay {
        k: f64,
        formulation: Formulation,
    }

    impl Decay {
        fn explicit(k: f64) -> Self {
            Self {
                k,
                formulation: Formulation::Explicit,
            }
        }

        fn implicit(k: f64) -> Self {
            Self {
                k,
                formulation: Formulation::Implicit,
            }
        }
    }

    impl Model for Decay {
        type Error = ArgError;

        fn dim(&self) -> usize {
            1
        }

        fn formulation(&self) -> Formulation {
            self.formulation
        }

        fn nominal_values(&self) -> InArgs {
            InArgs::at(0.0).with_x(DVector::from_element(1, 1.0))
        }

        fn residual(&self, args: &InArgs) -> Result<DVector, ArgError> {
            let x = args.require_x(1)?;
            match self.formulation {
                Formulation::Explicit => Ok(x * -self.k),
                Formulation::Implicit => Ok(args.require_x_dot(1)? + x * self.k),
            }
        }

        fn jacobian(&self, _args: &InArgs, coeffs: WCoeffs) -> Result<DMatrix, ArgError> {
            let value = match self.formulation {
                Formulation::Explicit => -self.k * coeffs.beta,
                Formulation::Implicit => coeffs.alpha + self.k * coeffs.beta,
            };
            Ok(DMatrix::from_element(1, 1, value))
        }
    }

    /// Explicit decay `ẋ = -p₀ x` with the rate read from the parameters.
    struct ParamDecay;

    impl Model for ParamDecay {
        type Error = ArgError;

        fn dim(&self) -> usize {
            1
        }

        fn formulation(&self) -> Formulation {
            Formulation::Explicit
        }

        fn nominal_values(&self) -> InArgs {
            InArgs::at(0.0)
                .with_x(DVector::from_element(1, 1.0))
                .with_p(DVector::from_element(1, 1.0))
        }

        fn residual(&self, args: &InArgs) -> Result<DVector, ArgError> {
            let k = args.require_p(1)?[0];
            Ok(args.require_x(1)? * -k)
        }

        fn jacobian(&self, args: &InArgs, coeffs: WCoeffs) -> Result<DMatrix, ArgError> {
            let k = args.require_p(1)?[0];
            Ok(DMatrix::from_element(1, 1, -k * coeffs.beta))
        }
    }

    fn ic(x0: f64) -> InArgs {
        InArgs::at(0.0).with_x(DVector::from_element(1, x0))
    }

    // --- Tests ---

    #[test]
    fn backward_euler_matches_closed_form() {
        for model in [Decay::explicit(2.0), Decay::implicit(2.0)] {
            let mut stepper =
                Stepper::new(StepperAlgorithm::BackwardEuler, model, linear::Solver, &ic(1.0))
                    .unwrap();

            let point = stepper.take_step(0.1).unwrap();
            assert_relative_eq!(point.t, 0.1);
            assert_relative_eq!(point.x[0], 1.0 / 1.2, epsilon = 1e-14);
            assert_relative_eq!(point.x_dot[0], (1.0 / 1.2 - 1.0) / 0.1, epsilon = 1e-12);
        }
    }

    #[test]
    fn backward_euler_with_newton() {
        let solver = newton::Solver::new(newton::Config::new(1e-12, 5).unwrap());
        let mut stepper =
            Stepper::new(StepperAlgorithm::BackwardEuler, Decay::implicit(1.0), solver, &ic(2.0))
                .unwrap();

        stepper.take_step(0.5).unwrap();
        stepper.take_step(0.5).unwrap();
        assert_relative_eq!(stepper.time(), 1.0);
        assert_relative_eq!(stepper.current().x[0], 2.0 / 2.25, epsilon = 1e-12);
    }

    #[test]
    fn forward_euler_step() {
        let mut stepper = Stepper::new(
            StepperAlgorithm::ForwardEuler,
            Decay::explicit(2.0),
            linear::Solver,
            &ic(1.0),
        )
        .unwrap();

        assert_relative_eq!(stepper.current().x_dot[0], -2.0);
        let point = stepper.take_step(0.1).unwrap();
        assert_relative_eq!(point.x[0], 0.8, epsilon = 1e-14);
        assert_relative_eq!(point.x_dot[0], -1.6, epsilon = 1e-14);
    }

    #[test]
    fn rk4_is_fourth_order_accurate() {
        let mut stepper = Stepper::new(
            StepperAlgorithm::ExplicitRk4,
            Decay::explicit(1.0),
            linear::Solver,
            &ic(1.0),
        )
        .unwrap();

        for _ in 0..10 {
            stepper.take_step(0.1).unwrap();
        }
        assert_relative_eq!(stepper.current().x[0], (-1.0_f64).exp(), epsilon = 1e-6);
    }

    #[test]
    fn explicit_algorithms_reject_implicit_models() {
        for algorithm in [StepperAlgorithm::ForwardEuler, StepperAlgorithm::ExplicitRk4] {
            let result = Stepper::new(algorithm, Decay::implicit(1.0), linear::Solver, &ic(1.0));
            assert!(matches!(
                result,
                Err(Error::RequiresExplicitModel { algorithm: a }) if a == algorithm
            ));
        }

        let mut stepper = Stepper::new(
            StepperAlgorithm::BackwardEuler,
            Decay::implicit(1.0),
            linear::Solver,
            &ic(1.0),
        )
        .unwrap();
        assert!(stepper.set_algorithm(StepperAlgorithm::ExplicitRk4).is_err());
        assert_eq!(stepper.algorithm(), StepperAlgorithm::BackwardEuler);
    }

    #[test]
    fn missing_x_dot_defaults() {
        let implicit = Stepper::new(
            StepperAlgorithm::BackwardEuler,
            Decay::implicit(3.0),
            linear::Solver,
            &ic(1.0),
        )
        .unwrap();
        assert_relative_eq!(implicit.current().x_dot[0], 0.0);

        let explicit = Stepper::new(
            StepperAlgorithm::BackwardEuler,
            Decay::explicit(3.0),
            linear::Solver,
            &ic(1.0),
        )
        .unwrap();
        assert_relative_eq!(explicit.current().x_dot[0], -3.0);
    }

    #[test]
    fn invalid_initial_conditions() {
        let missing = Stepper::new(
            StepperAlgorithm::BackwardEuler,
            Decay::explicit(1.0),
            linear::Solver,
            &InArgs::at(0.0),
        );
        assert!(matches!(
            missing,
            Err(Error::InitialCondition(ArgError::Missing("x")))
        ));

        let wrong_dim = InArgs::at(0.0).with_x(DVector::zeros(3));
        let result = Stepper::new(
            StepperAlgorithm::BackwardEuler,
            Decay::explicit(1.0),
            linear::Solver,
            &wrong_dim,
        );
        assert!(matches!(
            result,
            Err(Error::InitialCondition(ArgError::Dimension { .. }))
        ));
    }

    #[test]
    fn set_initial_condition_resets_state() {
        let mut stepper = Stepper::new(
            StepperAlgorithm::ForwardEuler,
            Decay::explicit(1.0),
            linear::Solver,
            &ic(1.0),
        )
        .unwrap();
        stepper.take_step(0.25).unwrap();

        let restart = InArgs::at(5.0)
            .with_x(DVector::from_element(1, 4.0))
            .with_x_dot(DVector::from_element(1, 7.0));
        stepper.set_initial_condition(&restart).unwrap();
        assert_relative_eq!(stepper.time(), 5.0);
        assert_relative_eq!(stepper.current().x[0], 4.0);
        assert_relative_eq!(stepper.current().x_dot[0], 7.0);
    }

    #[test]
    fn failed_reset_keeps_parameters() {
        let mut stepper = Stepper::new(
            StepperAlgorithm::ForwardEuler,
            ParamDecay,
            linear::Solver,
            &ic(1.0).with_p(DVector::from_element(1, 2.0)),
        )
        .unwrap();
        stepper.take_step(0.25).unwrap();

        assert!(stepper.set_initial_condition(&InArgs::at(3.0)).is_err());
        assert_eq!(stepper.parameters(), Some(&DVector::from_element(1, 2.0)));
        assert_relative_eq!(stepper.time(), 0.25);

        let point = stepper.take_step(0.25).unwrap();
        assert_relative_eq!(point.x[0], 0.25);

        // A reset without p keeps the current parameters.
        stepper.set_initial_condition(&ic(4.0)).unwrap();
        assert_eq!(stepper.parameters(), Some(&DVector::from_element(1, 2.0)));
        assert_relative_eq!(stepper.current().x_dot[0], -8.0);
    }

    #[test]
    fn rejects_bad_step_sizes() {
        let mut stepper = Stepper::new(
            StepperAlgorithm::ForwardEuler,
            Decay::explicit(1.0),
            linear::Solver,
            &ic(1.0),
        )
        .unwrap();

        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                stepper.take_step(dt),
                Err(Error::InvalidStepSize { .. })
            ));
        }
        assert_relative_eq!(stepper.time(), 0.0);
    }

    #[test]
    fn take_step_to_lands_exactly() {
        let mut stepper = Stepper::new(
            StepperAlgorithm::BackwardEuler,
            Decay::explicit(1.0),
            linear::Solver,
            &ic(1.0),
        )
        .unwrap();

        for _ in 0..3 {
            stepper.take_step(0.1).unwrap();
        }
        stepper.take_step_to(1.0).unwrap();
        assert_eq!(stepper.time(), 1.0);
        assert!(matches!(
            stepper.take_step_to(1.0),
            Err(Error::InvalidStepSize { .. })
        ));
    }

    #[test]
    fn unconverged_solve_fails_the_step() {
        // Newton with a single iteration cannot satisfy a zero tolerance
        // unless the guess is already exact.
        let solver = newton::Solver::new(newton::Config::new(0.0, 1).unwrap());
        let mut stepper =
            Stepper::new(StepperAlgorithm::BackwardEuler, Decay::implicit(1.0), solver, &ic(1.0))
                .unwrap();

        assert!(matches!(
            stepper.take_step(0.1),
            Err(Error::NotConverged { iters: 1, .. })
        ));
        assert_relative_eq!(stepper.time(), 0.0);
    }
}
