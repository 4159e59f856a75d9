use marcher_core::{
    ArgError, DMatrix, DVector, Formulation, InArgs, Model, StatePoint, WCoeffs,
    params::ParameterList,
};

use crate::{ACCEPT_PARAMS, ConfigError, IC_T0, IC_X0, IC_X1, IMPLICIT, finite, nonzero};

const COEFF_A: &str = "Coeff a";
const COEFF_F: &str = "Coeff f";
const COEFF_L: &str = "Coeff L";

/// A linear oscillator about `a` with angular frequency `ω = f / L`:
///
/// ```text
/// ẋ₀ = x₁
/// ẋ₁ = ω² (a - x₀)
/// ```
///
/// The model is linear in `x`, and [`SinCos::exact_solution`] gives the
/// closed-form trajectory from the configured initial condition.
///
/// # Configuration
///
/// | Name | Type | Default |
/// |---|---|---|
/// | `Implicit model formulation` | bool | `false` |
/// | `Accept model parameters` | bool | `false` (`p = [a, f, L]` when true) |
/// | `Coeff a` | double | `0.0` |
/// | `Coeff f` | double | `1.0` |
/// | `Coeff L` | double | `1.0` |
/// | `IC x_0` | double | `0.0` |
/// | `IC x_1` | double | `1.0` |
/// | `IC t_0` | double | `0.0` |
#[derive(Debug, Clone, PartialEq)]
pub struct SinCos {
    implicit: bool,
    accept_params: bool,
    a: f64,
    f: f64,
    l: f64,
    x0: [f64; 2],
    t0: f64,
}

impl Default for SinCos {
    fn default() -> Self {
        Self {
            implicit: false,
            accept_params: false,
            a: 0.0,
            f: 1.0,
            l: 1.0,
            x0: [0.0, 1.0],
            t0: 0.0,
        }
    }
}

impl SinCos {
    /// Reads the model from a parameter list.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names, wrongly typed values, a zero
    /// `f` or `L`, or non-finite values.
    pub fn from_parameter_list(list: &ParameterList) -> Result<Self, ConfigError> {
        list.check_names(
            "",
            &[
                IMPLICIT,
                ACCEPT_PARAMS,
                COEFF_A,
                COEFF_F,
                COEFF_L,
                IC_X0,
                IC_X1,
                IC_T0,
            ],
        )?;

        let d = Self::default();
        Ok(Self {
            implicit: list.get_bool(IMPLICIT)?.unwrap_or(d.implicit),
            accept_params: list.get_bool(ACCEPT_PARAMS)?.unwrap_or(d.accept_params),
            a: finite(COEFF_A, list.get_double(COEFF_A)?.unwrap_or(d.a))?,
            f: nonzero(COEFF_F, list.get_double(COEFF_F)?.unwrap_or(d.f))?,
            l: nonzero(COEFF_L, list.get_double(COEFF_L)?.unwrap_or(d.l))?,
            x0: [
                finite(IC_X0, list.get_double(IC_X0)?.unwrap_or(d.x0[0]))?,
                finite(IC_X1, list.get_double(IC_X1)?.unwrap_or(d.x0[1]))?,
            ],
            t0: finite(IC_T0, list.get_double(IC_T0)?.unwrap_or(d.t0))?,
        })
    }

    #[must_use]
    pub fn with_implicit(mut self, implicit: bool) -> Self {
        self.implicit = implicit;
        self
    }

    /// Returns the model reading `[a, f, L]` from `p` when `accept` is true.
    #[must_use]
    pub fn with_model_parameters(mut self, accept: bool) -> Self {
        self.accept_params = accept;
        self
    }

    /// Returns the closed-form state and derivative at `t`.
    ///
    /// Uses the model's own coefficients, not any parameter vector.
    #[must_use]
    pub fn exact_solution(&self, t: f64) -> StatePoint {
        let omega = self.f / self.l;
        let phi = omega * self.t0;
        let (dx, v) = (self.x0[0] - self.a, self.x0[1] / omega);

        let c1 = dx * phi.sin() + v * phi.cos();
        let c2 = dx * phi.cos() - v * phi.sin();
        let (s, c) = (omega * t).sin_cos();

        let x0 = self.a + c1 * s + c2 * c;
        let x1 = omega * (c1 * c - c2 * s);
        StatePoint::new(
            t,
            DVector::from_vec(vec![x0, x1]),
            DVector::from_vec(vec![x1, omega * omega * (self.a - x0)]),
        )
    }

    /// Returns `(a, ω²)` from `p` or the configured coefficients.
    fn coefficients(&self, args: &InArgs) -> Result<(f64, f64), ArgError> {
        let (a, f, l) = if self.accept_params {
            let p = args.require_p(3)?;
            (p[0], p[1], p[2])
        } else {
            (self.a, self.f, self.l)
        };
        Ok((a, (f / l) * (f / l)))
    }
}

impl Model for SinCos {
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

    fn nominal_values(&self) -> InArgs {
        let exact = self.exact_solution(self.t0);
        let args = InArgs::at(self.t0)
            .with_x(DVector::from_row_slice(&self.x0))
            .with_x_dot(exact.x_dot);

        if self.accept_params {
            args.with_p(DVector::from_vec(vec![self.a, self.f, self.l]))
        } else {
            args
        }
    }

    fn residual(&self, args: &InArgs) -> Result<DVector, ArgError> {
        let (a, omega2) = self.coefficients(args)?;
        let x = args.require_x(2)?;
        let f = DVector::from_vec(vec![x[1], omega2 * (a - x[0])]);

        if self.implicit {
            Ok(args.require_x_dot(2)? - f)
        } else {
            Ok(f)
        }
    }

    fn jacobian(&self, args: &InArgs, coeffs: WCoeffs) -> Result<DMatrix, ArgError> {
        let (_, omega2) = self.coefficients(args)?;
        let df_dx = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, -omega2, 0.0]);

        if self.implicit {
            Ok(DMatrix::identity(2, 2) * coeffs.alpha - df_dx * coeffs.beta)
        } else {
            Ok(df_dx * coeffs.beta)
        }
    }
}
