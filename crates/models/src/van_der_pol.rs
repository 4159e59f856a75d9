use marcher_core::{
    ArgError, DMatrix, DVector, Formulation, InArgs, Model, WCoeffs, params::ParameterList,
};

use crate::{ACCEPT_PARAMS, ConfigError, IC_T0, IC_X0, IC_X1, IMPLICIT, finite};

const EPSILON: &str = "Coeff epsilon";

/// The Van der Pol oscillator in first-order form:
///
/// ```text
/// ẋ₀ = x₁
/// ẋ₁ = ε (1 - x₀²) x₁ - x₀
/// ```
///
/// `ε` scales the nonlinear damping; `ε = 0` is the harmonic oscillator and
/// large `ε` makes the system stiff.
///
/// # Configuration
///
/// | Name | Type | Default |
/// |---|---|---|
/// | `Implicit model formulation` | bool | `false` |
/// | `Accept model parameters` | bool | `false` (`ε` read from `p[0]` when true) |
/// | `Coeff epsilon` | double | `0.5` |
/// | `IC x_0` | double | `2.0` |
/// | `IC x_1` | double | `0.0` |
/// | `IC t_0` | double | `0.0` |
#[derive(Debug, Clone, PartialEq)]
pub struct VanDerPol {
    implicit: bool,
    accept_params: bool,
    epsilon: f64,
    x0: [f64; 2],
    t0: f64,
}

impl Default for VanDerPol {
    fn default() -> Self {
        Self {
            implicit: false,
            accept_params: false,
            epsilon: 0.5,
            x0: [2.0, 0.0],
            t0: 0.0,
        }
    }
}

impl VanDerPol {
    /// Creates an explicit model with coefficient `epsilon` and the default
    /// initial condition.
    ///
    /// # Errors
    ///
    /// Returns an error if `epsilon` is non-finite.
    pub fn new(epsilon: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            epsilon: finite(EPSILON, epsilon)?,
            ..Self::default()
        })
    }

    /// Reads the model from a parameter list.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names, wrongly typed values, or a
    /// non-finite `ε` or initial condition.
    pub fn from_parameter_list(list: &ParameterList) -> Result<Self, ConfigError> {
        list.check_names(
            "",
            &[IMPLICIT, ACCEPT_PARAMS, EPSILON, IC_X0, IC_X1, IC_T0],
        )?;

        let d = Self::default();
        Ok(Self {
            implicit: list.get_bool(IMPLICIT)?.unwrap_or(d.implicit),
            accept_params: list.get_bool(ACCEPT_PARAMS)?.unwrap_or(d.accept_params),
            epsilon: finite(EPSILON, list.get_double(EPSILON)?.unwrap_or(d.epsilon))?,
            x0: [
                finite(IC_X0, list.get_double(IC_X0)?.unwrap_or(d.x0[0]))?,
                finite(IC_X1, list.get_double(IC_X1)?.unwrap_or(d.x0[1]))?,
            ],
            t0: finite(IC_T0, list.get_double(IC_T0)?.unwrap_or(d.t0))?,
        })
    }

    /// Returns the model presented in implicit form when `implicit` is true.
    #[must_use]
    pub fn with_implicit(mut self, implicit: bool) -> Self {
        self.implicit = implicit;
        self
    }

    /// Returns the model reading `ε` from `p[0]` when `accept` is true.
    #[must_use]
    pub fn with_model_parameters(mut self, accept: bool) -> Self {
        self.accept_params = accept;
        self
    }

    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    fn epsilon_from(&self, args: &InArgs) -> Result<f64, ArgError> {
        if self.accept_params {
            Ok(args.require_p(1)?[0])
        } else {
            Ok(self.epsilon)
        }
    }
}

fn rhs(x: &DVector, eps: f64) -> DVector {
    DVector::from_vec(vec![x[1], eps * (1.0 - x[0] * x[0]) * x[1] - x[0]])
}

fn rhs_jacobian(x: &DVector, eps: f64) -> DMatrix {
    #[rustfmt::skip]
    let jac = DMatrix::from_row_slice(2, 2, &[
        0.0,                              1.0,
        -2.0 * eps * x[0] * x[1] - 1.0,   eps * (1.0 - x[0] * x[0]),
    ]);
    jac
}

impl Model for VanDerPol {
    type Error = ArgError;

    fn dim(&self) -> usize {
        2
    }

    fn formulation(&self) -> Formulation {
        if self.implicit {
            Formulation::Implicit
        } else {
            Formulation::Explicit
        }
    }

    /// The configured initial condition, with a consistent `ẋ`.
    fn nominal_values(&self) -> InArgs {
        let x = DVector::from_row_slice(&self.x0);
        let x_dot = rhs(&x, self.epsilon);
        let args = InArgs::at(self.t0).with_x(x).with_x_dot(x_dot);

        if self.accept_params {
            args.with_p(DVector::from_element(1, self.epsilon))
        } else {
            args
        }
    }

    fn residual(&self, args: &InArgs) -> Result<DVector, ArgError> {
        let eps = self.epsilon_from(args)?;
        let f = rhs(args.require_x(2)?, eps);

        if self.implicit {
            Ok(args.require_x_dot(2)? - f)
        } else {
            Ok(f)
        }
    }

    fn jacobian(&self, args: &InArgs, coeffs: WCoeffs) -> Result<DMatrix, ArgError> {
        let eps = self.epsilon_from(args)?;
        let df_dx = rhs_jacobian(args.require_x(2)?, eps);

        if self.implicit {
            Ok(DMatrix::identity(2, 2) * coeffs.alpha - df_dx * coeffs.beta)
        } else {
            Ok(df_dx * coeffs.beta)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use marcher_core::params::ParamError;

    fn args(x: [f64; 2], x_dot: [f64; 2]) -> InArgs {
        InArgs::at(0.0)
            .with_x(DVector::from_row_slice(&x))
            .with_x_dot(DVector::from_row_slice(&x_dot))
    }

    #[test]
    fn nominal_values_are_consistent() {
        let model = VanDerPol::default();
        let nominal = model.nominal_values();

        assert_eq!(nominal.t, 0.0);
        assert_eq!(nominal.x, Some(DVector::from_vec(vec![2.0, 0.0])));
        // ẋ₁ = 0.5 (1 - 4) 0 - 2
        assert_eq!(nominal.x_dot, Some(DVector::from_vec(vec![0.0, -2.0])));
        assert_eq!(nominal.p, None);

        let implicit = model.with_implicit(true);
        let residual = implicit.residual(&implicit.nominal_values()).unwrap();
        assert_relative_eq!(residual.norm(), 0.0);
    }

    #[test]
    fn explicit_and_implicit_residuals() {
        let explicit = VanDerPol::new(0.25).unwrap();
        let implicit = explicit.clone().with_implicit(true);
        let a = args([1.5, -0.5], [0.1, 0.2]);

        let f = explicit.residual(&a).unwrap();
        assert_relative_eq!(f[0], -0.5);
        assert_relative_eq!(f[1], 0.25 * (1.0 - 2.25) * -0.5 - 1.5);

        let r = implicit.residual(&a).unwrap();
        assert_relative_eq!(r[0], 0.1 - f[0]);
        assert_relative_eq!(r[1], 0.2 - f[1]);
    }

    #[test]
    fn jacobian_matches_finite_differences() {
        let model = VanDerPol::new(0.3).unwrap();
        let x = [0.7, -1.2];
        let h = 1e-7;

        let jac = model
            .jacobian(&args(x, [0.0, 0.0]), WCoeffs::X)
            .unwrap();
        for j in 0..2 {
            let mut xp = x;
            xp[j] += h;
            let fp = model.residual(&args(xp, [0.0, 0.0])).unwrap();
            let f = model.residual(&args(x, [0.0, 0.0])).unwrap();
            for i in 0..2 {
                assert_relative_eq!(jac[(i, j)], (fp[i] - f[i]) / h, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn implicit_jacobian_weights_both_terms() {
        let model = VanDerPol::default().with_implicit(true);
        let a = args([2.0, 0.0], [0.0, 0.0]);

        let w = model.jacobian(&a, WCoeffs::new(3.0, 2.0)).unwrap();
        let df_dx = rhs_jacobian(a.x.as_ref().unwrap(), 0.5);
        assert_relative_eq!(w, DMatrix::identity(2, 2) * 3.0 - df_dx * 2.0);
    }

    #[test]
    fn reads_epsilon_from_parameters() {
        let model = VanDerPol::default().with_model_parameters(true);
        let nominal = model.nominal_values();
        assert_eq!(nominal.p, Some(DVector::from_element(1, 0.5)));

        let mut a = args([1.0, 1.0], [0.0, 0.0]);
        assert_eq!(model.residual(&a), Err(ArgError::Missing("p")));

        a.set_p(DVector::from_element(1, 3.0));
        let f = model.residual(&a).unwrap();
        // ẋ₁ = 3 (1 - 1) 1 - 1
        assert_relative_eq!(f[1], -1.0);

        a.set_x(DVector::from_vec(vec![0.5, 1.0]));
        let f = model.residual(&a).unwrap();
        assert_relative_eq!(f[1], 3.0 * 0.75 - 0.5);
    }

    #[test]
    fn from_parameter_list() {
        let mut list = ParameterList::new();
        list.set(IMPLICIT, true)
            .set(EPSILON, 0.1)
            .set(IC_X0, 1.0)
            .set(IC_T0, 0.5);

        let model = VanDerPol::from_parameter_list(&list).unwrap();
        assert_eq!(model.formulation(), Formulation::Implicit);
        assert_relative_eq!(model.epsilon(), 0.1);

        let nominal = model.nominal_values();
        assert_eq!(nominal.t, 0.5);
        assert_eq!(nominal.x, Some(DVector::from_vec(vec![1.0, 0.0])));

        assert_eq!(
            VanDerPol::from_parameter_list(&ParameterList::new()).unwrap(),
            VanDerPol::default()
        );
    }

    #[test]
    fn rejects_bad_configuration() {
        let mut list = ParameterList::new();
        list.set(EPSILON, f64::INFINITY);
        assert_eq!(
            VanDerPol::from_parameter_list(&list),
            Err(ConfigError::NonFinite {
                name: EPSILON,
                value: f64::INFINITY
            })
        );

        let mut list = ParameterList::new();
        list.set("Coeff mu", 1.0);
        assert!(matches!(
            VanDerPol::from_parameter_list(&list),
            Err(ConfigError::Param(ParamError::Unknown { .. }))
        ));
    }
}
