//! Builds integrators from nested parameter lists.
//!
//! [`IntegratorBuilder::from_parameter_list`] reads the sublists below.
//! Every list rejects names it does not recognize, reporting the full key
//! path. A selection list may also hold a sublist named after one of its
//! choices; only the selected one is read.
//!
//! ```text
//! Integrator Settings
//!   Final Time                               double  1.0
//!   Land On Final Time                       bool    true
//!   Integrator Selection
//!     Integrator Type                        string  "Default Integrator"
//!     Default Integrator
//!       Max Number Time Steps                int     10000
//! Stepper Settings
//!   Stepper Selection
//!     Stepper Type                           string  "Backward Euler"
//! Integration Control Strategy Selection
//!   Integration Control Strategy Type        string  "None"
//!   Simple Integration Control Strategy
//!     Take Variable Steps                    bool    true
//!     Fixed dt                               double  (unset)
//!     Number of Time Steps                   int     (unset)
//!     Max dt                                 double  (unbounded)
//! Interpolation Buffer Settings
//!   Trailing Interpolation Buffer Selection
//!     Interpolation Buffer Type              string  "None"
//!     Interpolation Buffer
//!       StorageLimit                         int     (unlimited)
//!   Interpolator Selection
//!     Interpolator Type                      string  "Linear Interpolator"
//! ```

use marcher_core::{
    InArgs, Model,
    params::{ParamError, ParameterList, key_path},
};
use thiserror::Error;

use crate::{
    buffer::{InterpolationBuffer, Interpolator},
    integrator::{self, Config, IntegrationControl, Integrator, SimpleControl},
    nonlinear::NonlinearSolver,
    stepper::{Stepper, StepperAlgorithm},
};

const INTEGRATOR_SETTINGS: &str = "Integrator Settings";
const FINAL_TIME: &str = "Final Time";
const LAND_ON_FINAL_TIME: &str = "Land On Final Time";
const INTEGRATOR_SELECTION: &str = "Integrator Selection";
const INTEGRATOR_TYPE: &str = "Integrator Type";
const DEFAULT_INTEGRATOR: &str = "Default Integrator";
const MAX_STEPS: &str = "Max Number Time Steps";

const STEPPER_SETTINGS: &str = "Stepper Settings";
const STEPPER_SELECTION: &str = "Stepper Selection";
const STEPPER_TYPE: &str = "Stepper Type";

const CONTROL_SELECTION: &str = "Integration Control Strategy Selection";
const CONTROL_TYPE: &str = "Integration Control Strategy Type";
const NO_CONTROL: &str = "None";
const SIMPLE_CONTROL: &str = "Simple Integration Control Strategy";
const TAKE_VARIABLE_STEPS: &str = "Take Variable Steps";
const FIXED_DT: &str = "Fixed dt";
const NUM_TIME_STEPS: &str = "Number of Time Steps";
const MAX_DT: &str = "Max dt";

const BUFFER_SETTINGS: &str = "Interpolation Buffer Settings";
const TRAILING_SELECTION: &str = "Trailing Interpolation Buffer Selection";
const BUFFER_TYPE: &str = "Interpolation Buffer Type";
const NO_BUFFER: &str = "None";
const INTERPOLATION_BUFFER: &str = "Interpolation Buffer";
const STORAGE_LIMIT: &str = "StorageLimit";
const INTERPOLATOR_SELECTION: &str = "Interpolator Selection";
const INTERPOLATOR_TYPE: &str = "Interpolator Type";

const INTEGRATOR_CHOICES: &[&str] = &[DEFAULT_INTEGRATOR];
const CONTROL_CHOICES: &[&str] = &[NO_CONTROL, SIMPLE_CONTROL];
const BUFFER_CHOICES: &[&str] = &[NO_BUFFER, INTERPOLATION_BUFFER];

/// Errors that can occur when reading an integrator configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error(transparent)]
    Param(#[from] ParamError),

    #[error("`{path}` must be one of {choices:?}, got {value:?}")]
    InvalidChoice {
        path: String,
        value: String,
        choices: Vec<&'static str>,
    },

    #[error("`Final Time` must be finite, got {0}")]
    FinalTime(f64),

    #[error("`StorageLimit` must be at least 1")]
    StorageLimit,

    #[error("fixed steps need `Fixed dt` or `Number of Time Steps`")]
    MissingFixedStep,

    #[error(transparent)]
    Integrator(#[from] integrator::ConfigError),
}

/// A trailing buffer request: created empty for each integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingBuffer {
    pub storage_limit: Option<usize>,
}

/// Creates integrators with a shared configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegratorBuilder {
    final_time: f64,
    algorithm: StepperAlgorithm,
    config: Config,
    interpolator: Interpolator,
    trailing: Option<TrailingBuffer>,
}

impl Default for IntegratorBuilder {
    fn default() -> Self {
        Self {
            final_time: 1.0,
            algorithm: StepperAlgorithm::BackwardEuler,
            config: Config::default(),
            interpolator: Interpolator::Linear,
            trailing: None,
        }
    }
}

impl IntegratorBuilder {
    /// Reads a builder from a parameter list, using defaults for anything
    /// left unset.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown names, wrongly typed values, unknown
    /// choices, or invalid settings.
    pub fn from_parameter_list(list: &ParameterList) -> Result<Self, ConfigError> {
        list.check_names(
            "",
            &[
                INTEGRATOR_SETTINGS,
                STEPPER_SETTINGS,
                CONTROL_SELECTION,
                BUFFER_SETTINGS,
            ],
        )?;

        let defaults = Self::default();
        let empty = ParameterList::new();

        // Integrator settings.
        let settings = sublist_or(list, INTEGRATOR_SETTINGS, &empty)?;
        settings.check_names(
            INTEGRATOR_SETTINGS,
            &[FINAL_TIME, LAND_ON_FINAL_TIME, INTEGRATOR_SELECTION],
        )?;
        let final_time = settings
            .get_double(FINAL_TIME)?
            .unwrap_or(defaults.final_time);
        if !final_time.is_finite() {
            return Err(ConfigError::FinalTime(final_time));
        }
        let land_on_final_time = settings
            .get_bool(LAND_ON_FINAL_TIME)?
            .unwrap_or(defaults.config.land_on_final_time());

        let path = key_path(INTEGRATOR_SETTINGS, INTEGRATOR_SELECTION);
        let selection = sublist_or(settings, INTEGRATOR_SELECTION, &empty)?;
        let selected = select(
            selection,
            &path,
            INTEGRATOR_TYPE,
            INTEGRATOR_CHOICES,
            DEFAULT_INTEGRATOR,
        )?;
        let selected = sublist_or(selection, selected, &empty)?;
        selected.check_names(&key_path(&path, DEFAULT_INTEGRATOR), &[MAX_STEPS])?;
        let max_steps = match selected.get_int(MAX_STEPS)? {
            Some(n) => usize::try_from(n).map_err(|_| integrator::ConfigError::MaxSteps)?,
            None => defaults.config.max_steps(),
        };

        // Stepper settings.
        let stepper = sublist_or(list, STEPPER_SETTINGS, &empty)?;
        stepper.check_names(STEPPER_SETTINGS, &[STEPPER_SELECTION])?;
        let path = key_path(STEPPER_SETTINGS, STEPPER_SELECTION);
        let selection = sublist_or(stepper, STEPPER_SELECTION, &empty)?;
        let name = select(
            selection,
            &path,
            STEPPER_TYPE,
            &StepperAlgorithm::NAMES,
            defaults.algorithm.name(),
        )?;
        let algorithm = StepperAlgorithm::from_name(name).unwrap_or(defaults.algorithm);

        // Integration control.
        let selection = sublist_or(list, CONTROL_SELECTION, &empty)?;
        let control = match select(
            selection,
            CONTROL_SELECTION,
            CONTROL_TYPE,
            CONTROL_CHOICES,
            NO_CONTROL,
        )? {
            SIMPLE_CONTROL => {
                let path = key_path(CONTROL_SELECTION, SIMPLE_CONTROL);
                let simple = sublist_or(selection, SIMPLE_CONTROL, &empty)?;
                IntegrationControl::Simple(simple_control(simple, &path)?)
            }
            _ => IntegrationControl::None,
        };

        // Interpolation buffers.
        let buffers = sublist_or(list, BUFFER_SETTINGS, &empty)?;
        buffers.check_names(BUFFER_SETTINGS, &[TRAILING_SELECTION, INTERPOLATOR_SELECTION])?;

        let path = key_path(BUFFER_SETTINGS, TRAILING_SELECTION);
        let selection = sublist_or(buffers, TRAILING_SELECTION, &empty)?;
        let trailing = match select(selection, &path, BUFFER_TYPE, BUFFER_CHOICES, NO_BUFFER)? {
            INTERPOLATION_BUFFER => {
                let buffer = sublist_or(selection, INTERPOLATION_BUFFER, &empty)?;
                buffer.check_names(&key_path(&path, INTERPOLATION_BUFFER), &[STORAGE_LIMIT])?;
                let storage_limit = match buffer.get_int(STORAGE_LIMIT)? {
                    Some(n) if n < 1 => return Err(ConfigError::StorageLimit),
                    Some(n) => Some(usize::try_from(n).map_err(|_| ConfigError::StorageLimit)?),
                    None => None,
                };
                Some(TrailingBuffer { storage_limit })
            }
            _ => None,
        };

        let path = key_path(BUFFER_SETTINGS, INTERPOLATOR_SELECTION);
        let selection = sublist_or(buffers, INTERPOLATOR_SELECTION, &empty)?;
        let name = select(
            selection,
            &path,
            INTERPOLATOR_TYPE,
            &Interpolator::NAMES,
            defaults.interpolator.name(),
        )?;
        let interpolator = Interpolator::from_name(name).unwrap_or(defaults.interpolator);

        Ok(Self {
            final_time,
            algorithm,
            config: Config::new(control, land_on_final_time, max_steps)?,
            interpolator,
            trailing,
        })
    }

    /// Creates an integrator for `model` starting from `ic`.
    ///
    /// The integrator runs over `[ic.t, final_time]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stepper cannot step the model, the initial
    /// condition is invalid, or the final time precedes `ic.t`.
    pub fn create<M: Model, S: NonlinearSolver>(
        &self,
        model: M,
        ic: &InArgs,
        solver: S,
    ) -> Result<Integrator<M, S>, integrator::Error> {
        let stepper = Stepper::new(self.algorithm, model, solver, ic)?;
        let trailing = self
            .trailing
            .map(|buffer| InterpolationBuffer::new(self.interpolator, buffer.storage_limit));
        Integrator::new(stepper, self.final_time, self.config, trailing)
    }

    /// Returns the builder with a different final time.
    #[must_use]
    pub fn with_final_time(mut self, final_time: f64) -> Self {
        self.final_time = final_time;
        self
    }

    /// Returns the builder with a different stepper algorithm.
    #[must_use]
    pub fn with_stepper_algorithm(mut self, algorithm: StepperAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Returns the builder with a different integrator config.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Returns the builder keeping a trailing buffer of accepted states.
    #[must_use]
    pub fn with_trailing_buffer(mut self, storage_limit: Option<usize>) -> Self {
        self.trailing = Some(TrailingBuffer { storage_limit });
        self
    }

    #[must_use]
    pub fn final_time(&self) -> f64 {
        self.final_time
    }

    #[must_use]
    pub fn stepper_algorithm(&self) -> StepperAlgorithm {
        self.algorithm
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn interpolator(&self) -> Interpolator {
        self.interpolator
    }

    #[must_use]
    pub fn trailing_buffer(&self) -> Option<TrailingBuffer> {
        self.trailing
    }
}

fn sublist_or<'a>(
    list: &'a ParameterList,
    name: &str,
    empty: &'a ParameterList,
) -> Result<&'a ParameterList, ConfigError> {
    Ok(list.sublist(name)?.unwrap_or(empty))
}

/// Reads a selection list: the choice under `key` plus, optionally, one
/// sublist per choice.
fn select<'a>(
    list: &'a ParameterList,
    path: &str,
    key: &str,
    choices: &[&'static str],
    default: &'a str,
) -> Result<&'a str, ConfigError> {
    let mut valid = vec![key];
    valid.extend_from_slice(choices);
    list.check_names(path, &valid)?;

    let value = list.get_str(key)?.unwrap_or(default);
    if choices.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidChoice {
            path: key_path(path, key),
            value: value.to_owned(),
            choices: choices.to_vec(),
        })
    }
}

fn simple_control(list: &ParameterList, path: &str) -> Result<SimpleControl, ConfigError> {
    list.check_names(
        path,
        &[TAKE_VARIABLE_STEPS, FIXED_DT, NUM_TIME_STEPS, MAX_DT],
    )?;

    if list.get_bool(TAKE_VARIABLE_STEPS)?.unwrap_or(true) {
        return Ok(SimpleControl::Variable {
            max_dt: list.get_double(MAX_DT)?,
        });
    }

    if let Some(dt) = list.get_double(FIXED_DT)? {
        return Ok(SimpleControl::FixedDt(dt));
    }
    match list.get_int(NUM_TIME_STEPS)? {
        Some(n) => usize::try_from(n)
            .map(SimpleControl::FixedSteps)
            .map_err(|_| integrator::ConfigError::NumSteps.into()),
        None => Err(ConfigError::MissingFixedStep),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn fixed_dt_list(dt: f64) -> ParameterList {
        let mut list = ParameterList::new();
        list.sublist_mut(STEPPER_SETTINGS)
            .sublist_mut(STEPPER_SELECTION)
            .set(STEPPER_TYPE, "Backward Euler");

        let control = list.sublist_mut(CONTROL_SELECTION);
        control.set(CONTROL_TYPE, SIMPLE_CONTROL);
        control
            .sublist_mut(SIMPLE_CONTROL)
            .set(TAKE_VARIABLE_STEPS, false)
            .set(FIXED_DT, dt);

        list.sublist_mut(BUFFER_SETTINGS)
            .sublist_mut(TRAILING_SELECTION)
            .set(BUFFER_TYPE, INTERPOLATION_BUFFER);
        list
    }

    #[test]
    fn empty_list_gives_defaults() {
        let builder = IntegratorBuilder::from_parameter_list(&ParameterList::new()).unwrap();
        assert_eq!(builder, IntegratorBuilder::default());
        assert_relative_eq!(builder.final_time(), 1.0);
        assert_eq!(builder.stepper_algorithm(), StepperAlgorithm::BackwardEuler);
        assert_eq!(builder.config().control(), IntegrationControl::None);
        assert!(builder.config().land_on_final_time());
        assert_eq!(builder.config().max_steps(), 10_000);
        assert_eq!(builder.trailing_buffer(), None);
    }

    #[test]
    fn reads_fixed_step_settings() {
        let builder = IntegratorBuilder::from_parameter_list(&fixed_dt_list(0.5)).unwrap();
        assert_eq!(
            builder.config().control(),
            IntegrationControl::Simple(SimpleControl::FixedDt(0.5))
        );
        assert_eq!(
            builder.trailing_buffer(),
            Some(TrailingBuffer {
                storage_limit: None
            })
        );
    }

    #[test]
    fn reads_every_section() {
        let list = ParameterList::from_json_str(
            r#"{
                "Integrator Settings": {
                    "Final Time": 2,
                    "Land On Final Time": false,
                    "Integrator Selection": {
                        "Integrator Type": "Default Integrator",
                        "Default Integrator": { "Max Number Time Steps": 50 }
                    }
                },
                "Stepper Settings": {
                    "Stepper Selection": { "Stepper Type": "Explicit RK" }
                },
                "Integration Control Strategy Selection": {
                    "Integration Control Strategy Type": "Simple Integration Control Strategy",
                    "Simple Integration Control Strategy": {
                        "Take Variable Steps": false,
                        "Number of Time Steps": 8
                    }
                },
                "Interpolation Buffer Settings": {
                    "Trailing Interpolation Buffer Selection": {
                        "Interpolation Buffer Type": "Interpolation Buffer",
                        "Interpolation Buffer": { "StorageLimit": 3 }
                    },
                    "Interpolator Selection": { "Interpolator Type": "Hermite Interpolator" }
                }
            }"#,
        )
        .unwrap();

        let builder = IntegratorBuilder::from_parameter_list(&list).unwrap();
        assert_relative_eq!(builder.final_time(), 2.0);
        assert_eq!(builder.stepper_algorithm(), StepperAlgorithm::ExplicitRk4);
        assert_eq!(
            *builder.config(),
            Config::new(
                IntegrationControl::Simple(SimpleControl::FixedSteps(8)),
                false,
                50
            )
            .unwrap()
        );
        assert_eq!(builder.interpolator(), Interpolator::Hermite);
        assert_eq!(
            builder.trailing_buffer(),
            Some(TrailingBuffer {
                storage_limit: Some(3)
            })
        );
    }

    #[test]
    fn variable_steps_read_max_dt() {
        let mut list = ParameterList::new();
        let control = list.sublist_mut(CONTROL_SELECTION);
        control.set(CONTROL_TYPE, SIMPLE_CONTROL);
        control.sublist_mut(SIMPLE_CONTROL).set(MAX_DT, 0.1);

        let builder = IntegratorBuilder::from_parameter_list(&list).unwrap();
        assert_eq!(
            builder.config().control(),
            IntegrationControl::Simple(SimpleControl::Variable { max_dt: Some(0.1) })
        );
    }

    #[test]
    fn rejects_unknown_names_with_full_path() {
        let mut list = fixed_dt_list(0.5);
        list.sublist_mut(STEPPER_SETTINGS)
            .sublist_mut(STEPPER_SELECTION)
            .set("Bogus", 1_i64);

        assert_eq!(
            IntegratorBuilder::from_parameter_list(&list),
            Err(ConfigError::Param(ParamError::Unknown {
                path: "Stepper Settings > Stepper Selection > Bogus".to_owned()
            }))
        );
    }

    #[test]
    fn rejects_unknown_choices() {
        let mut list = ParameterList::new();
        list.sublist_mut(STEPPER_SETTINGS)
            .sublist_mut(STEPPER_SELECTION)
            .set(STEPPER_TYPE, "Implicit BDF");

        let Err(ConfigError::InvalidChoice { path, value, choices }) =
            IntegratorBuilder::from_parameter_list(&list)
        else {
            panic!("expected an invalid choice");
        };
        assert_eq!(path, "Stepper Settings > Stepper Selection > Stepper Type");
        assert_eq!(value, "Implicit BDF");
        assert_eq!(choices, StepperAlgorithm::NAMES.to_vec());
    }

    #[test]
    fn rejects_wrong_types() {
        let mut list = ParameterList::new();
        list.sublist_mut(INTEGRATOR_SETTINGS)
            .set(FINAL_TIME, "one");

        assert!(matches!(
            IntegratorBuilder::from_parameter_list(&list),
            Err(ConfigError::Param(ParamError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn rejects_invalid_values() {
        let mut list = fixed_dt_list(-0.5);
        assert_eq!(
            IntegratorBuilder::from_parameter_list(&list),
            Err(ConfigError::Integrator(integrator::ConfigError::StepSize(-0.5)))
        );

        list.sublist_mut(CONTROL_SELECTION)
            .sublist_mut(SIMPLE_CONTROL)
            .set(FIXED_DT, 0.5);
        list.sublist_mut(BUFFER_SETTINGS)
            .sublist_mut(TRAILING_SELECTION)
            .sublist_mut(INTERPOLATION_BUFFER)
            .set(STORAGE_LIMIT, 0_i64);
        assert_eq!(
            IntegratorBuilder::from_parameter_list(&list),
            Err(ConfigError::StorageLimit)
        );
    }

    #[test]
    fn fixed_steps_need_a_size() {
        let mut list = ParameterList::new();
        let control = list.sublist_mut(CONTROL_SELECTION);
        control.set(CONTROL_TYPE, SIMPLE_CONTROL);
        control
            .sublist_mut(SIMPLE_CONTROL)
            .set(TAKE_VARIABLE_STEPS, false);

        assert_eq!(
            IntegratorBuilder::from_parameter_list(&list),
            Err(ConfigError::MissingFixedStep)
        );
    }
}
