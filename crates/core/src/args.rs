use thiserror::Error;

use crate::DVector;

/// Errors raised when a model argument is missing or malformed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgError {
    #[error("required argument `{0}` is not set")]
    Missing(&'static str),

    #[error("argument `{name}` has dimension {found}, expected {expected}")]
    Dimension {
        name: &'static str,
        expected: usize,
        found: usize,
    },
}

/// The named arguments passed to a [`Model`](crate::Model).
///
/// Holds the time `t` together with optional state `x`, state derivative
/// `x_dot`, and parameter vector `p`. The same bundle describes a model's
/// nominal values and an integrator's initial condition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InArgs {
    pub t: f64,
    pub x: Option<DVector>,
    pub x_dot: Option<DVector>,
    pub p: Option<DVector>,
}

impl InArgs {
    /// Creates an empty bundle at time `t`.
    #[must_use]
    pub fn at(t: f64) -> Self {
        Self {
            t,
            ..Self::default()
        }
    }

    /// Returns the bundle with `x` set.
    #[must_use]
    pub fn with_x(mut self, x: DVector) -> Self {
        self.x = Some(x);
        self
    }

    /// Returns the bundle with `x_dot` set.
    #[must_use]
    pub fn with_x_dot(mut self, x_dot: DVector) -> Self {
        self.x_dot = Some(x_dot);
        self
    }

    /// Returns the bundle with `p` set.
    #[must_use]
    pub fn with_p(mut self, p: DVector) -> Self {
        self.p = Some(p);
        self
    }

    pub fn set_t(&mut self, t: f64) {
        self.t = t;
    }

    pub fn set_x(&mut self, x: DVector) {
        self.x = Some(x);
    }

    pub fn set_x_dot(&mut self, x_dot: DVector) {
        self.x_dot = Some(x_dot);
    }

    pub fn set_p(&mut self, p: DVector) {
        self.p = Some(p);
    }

    /// Returns `x`, checking that it is set and has dimension `dim`.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgError`] if `x` is unset or has the wrong dimension.
    pub fn require_x(&self, dim: usize) -> Result<&DVector, ArgError> {
        require("x", self.x.as_ref(), dim)
    }

    /// Returns `x_dot`, checking that it is set and has dimension `dim`.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgError`] if `x_dot` is unset or has the wrong dimension.
    pub fn require_x_dot(&self, dim: usize) -> Result<&DVector, ArgError> {
        require("x_dot", self.x_dot.as_ref(), dim)
    }

    /// Returns `p`, checking that it is set and has dimension `dim`.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgError`] if `p` is unset or has the wrong dimension.
    pub fn require_p(&self, dim: usize) -> Result<&DVector, ArgError> {
        require("p", self.p.as_ref(), dim)
    }
}

fn require<'a>(
    name: &'static str,
    value: Option<&'a DVector>,
    dim: usize,
) -> Result<&'a DVector, ArgError> {
    let value = value.ok_or(ArgError::Missing(name))?;
    if value.len() == dim {
        Ok(value)
    } else {
        Err(ArgError::Dimension {
            name,
            expected: dim,
            found: value.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let args = InArgs::at(0.5)
            .with_x(DVector::from_vec(vec![1.0, 2.0]))
            .with_x_dot(DVector::zeros(2));

        assert_eq!(args.t, 0.5);
        assert_eq!(args.require_x(2).unwrap().as_slice(), &[1.0, 2.0]);
        assert_eq!(args.require_x_dot(2).unwrap().as_slice(), &[0.0, 0.0]);
        assert!(args.p.is_none());
    }

    #[test]
    fn missing_argument_is_reported() {
        let args = InArgs::at(0.0);
        assert_eq!(args.require_x(2), Err(ArgError::Missing("x")));
        assert_eq!(args.require_p(1), Err(ArgError::Missing("p")));
    }

    #[test]
    fn wrong_dimension_is_reported() {
        let mut args = InArgs::default();
        args.set_x_dot(DVector::zeros(3));

        assert_eq!(
            args.require_x_dot(2),
            Err(ArgError::Dimension {
                name: "x_dot",
                expected: 2,
                found: 3,
            })
        );
    }
}
