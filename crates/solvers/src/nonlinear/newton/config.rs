use marcher_core::params::{ParamError, ParameterList};
use thiserror::Error;

const TOL: &str = "Default Tol";
const MAX_ITERS: &str = "Default Max Iters";

/// Configuration for the Newton solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    tol: f64,
    max_iters: usize,
}

/// Errors that can occur when building a Newton solver config.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tol must be finite and non-negative")]
    Tol,

    #[error("max_iters must be at least 1")]
    MaxIters,

    #[error(transparent)]
    Param(#[from] ParamError),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tol: 1e-2,
            max_iters: 3,
        }
    }
}

impl Config {
    /// Creates a new config with a validated tolerance and iteration limit.
    ///
    /// # Errors
    ///
    /// Returns an error if `tol` is negative or non-finite, or if
    /// `max_iters` is zero.
    pub fn new(tol: f64, max_iters: usize) -> Result<Self, ConfigError> {
        if !tol.is_finite() || tol < 0.0 {
            return Err(ConfigError::Tol);
        }
        if max_iters == 0 {
            return Err(ConfigError::MaxIters);
        }
        Ok(Self { tol, max_iters })
    }

    /// Reads `Default Tol` and `Default Max Iters`, falling back to the
    /// defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns an error if the list holds unknown names, wrongly typed
    /// values, or invalid settings.
    pub fn from_parameter_list(list: &ParameterList) -> Result<Self, ConfigError> {
        list.check_names("", &[TOL, MAX_ITERS])?;

        let defaults = Self::default();
        let tol = list.get_double(TOL)?.unwrap_or(defaults.tol);
        let max_iters = match list.get_int(MAX_ITERS)? {
            Some(n) => usize::try_from(n).map_err(|_| ConfigError::MaxIters)?,
            None => defaults.max_iters,
        };

        Self::new(tol, max_iters)
    }

    /// Returns the convergence tolerance on the update norm.
    #[must_use]
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Returns the maximum number of iterations.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_time_step_solver() {
        let config = Config::default();
        assert_eq!(config.tol(), 1e-2);
        assert_eq!(config.max_iters(), 3);
    }

    #[test]
    fn reads_parameter_list() {
        let mut list = ParameterList::new();
        list.set(TOL, 1.0e-10).set(MAX_ITERS, 20_i64);

        let config = Config::from_parameter_list(&list).unwrap();
        assert_eq!(config, Config::new(1.0e-10, 20).unwrap());
    }

    #[test]
    fn empty_list_gives_defaults() {
        let config = Config::from_parameter_list(&ParameterList::new()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(Config::new(-1.0, 3), Err(ConfigError::Tol));
        assert_eq!(Config::new(1e-3, 0), Err(ConfigError::MaxIters));

        let mut list = ParameterList::new();
        list.set(MAX_ITERS, -4_i64);
        assert_eq!(Config::from_parameter_list(&list), Err(ConfigError::MaxIters));
    }

    #[test]
    fn rejects_unknown_names() {
        let mut list = ParameterList::new();
        list.set("Default Tolerance", 1e-6);

        assert!(matches!(
            Config::from_parameter_list(&list),
            Err(ConfigError::Param(ParamError::Unknown { .. }))
        ));
    }
}
