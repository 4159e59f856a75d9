//! Nested, typed configuration lists.
//!
//! A [`ParameterList`] maps names to [`Parameter`] values, where a value is a
//! scalar (`bool`, integer, double, string) or another list. Lists
//! deserialize from any self-describing serde format, so a configuration
//! such as
//!
//! ```json
//! {
//!   "Stepper Settings": {
//!     "Stepper Selection": { "Stepper Type": "Backward Euler" }
//!   }
//! }
//! ```
//!
//! can be read with [`ParameterList::from_json_str`] or with `toml`, and
//! then queried with the typed accessors. Components expose
//! `from_parameter_list` constructors that turn a list into a validated
//! config, rejecting names they do not recognize.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator used when rendering nested key paths.
pub const PATH_SEPARATOR: &str = " > ";

/// Errors that can occur when reading a [`ParameterList`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("parameter `{name}` has type {found}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unrecognized parameter `{path}`")]
    Unknown { path: String },

    #[error("invalid parameter list: {0}")]
    Parse(String),
}

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parameter {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    List(ParameterList),
}

impl Parameter {
    /// Returns a short name for the value's type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::List(_) => "list",
        }
    }
}

impl From<bool> for Parameter {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Parameter {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Parameter {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<ParameterList> for Parameter {
    fn from(value: ParameterList) -> Self {
        Self::List(value)
    }
}

/// A nested name/value configuration list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterList(BTreeMap<String, Parameter>);

impl ParameterList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a list from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Parse`] if the text is not a JSON object of
    /// parameters.
    pub fn from_json_str(text: &str) -> Result<Self, ParamError> {
        serde_json::from_str(text).map_err(|err| ParamError::Parse(err.to_string()))
    }

    /// Sets a parameter, replacing any existing value with the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Parameter>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Returns the raw parameter with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.0.get(name)
    }

    /// Returns true if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over parameter names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns a boolean parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::TypeMismatch`] if the value is not a `bool`.
    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, ParamError> {
        match self.get(name) {
            None => Ok(None),
            Some(Parameter::Bool(value)) => Ok(Some(*value)),
            Some(other) => Err(mismatch(name, "bool", other)),
        }
    }

    /// Returns an integer parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::TypeMismatch`] if the value is not an integer.
    pub fn get_int(&self, name: &str) -> Result<Option<i64>, ParamError> {
        match self.get(name) {
            None => Ok(None),
            Some(Parameter::Int(value)) => Ok(Some(*value)),
            Some(other) => Err(mismatch(name, "int", other)),
        }
    }

    /// Returns a double parameter, accepting integers as well.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::TypeMismatch`] if the value is not numeric.
    #[allow(clippy::cast_precision_loss)]
    pub fn get_double(&self, name: &str) -> Result<Option<f64>, ParamError> {
        match self.get(name) {
            None => Ok(None),
            Some(Parameter::Double(value)) => Ok(Some(*value)),
            Some(Parameter::Int(value)) => Ok(Some(*value as f64)),
            Some(other) => Err(mismatch(name, "double", other)),
        }
    }

    /// Returns a string parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::TypeMismatch`] if the value is not a string.
    pub fn get_str(&self, name: &str) -> Result<Option<&str>, ParamError> {
        match self.get(name) {
            None => Ok(None),
            Some(Parameter::String(value)) => Ok(Some(value)),
            Some(other) => Err(mismatch(name, "string", other)),
        }
    }

    /// Returns a nested list.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::TypeMismatch`] if the value is not a list.
    pub fn sublist(&self, name: &str) -> Result<Option<&ParameterList>, ParamError> {
        match self.get(name) {
            None => Ok(None),
            Some(Parameter::List(list)) => Ok(Some(list)),
            Some(other) => Err(mismatch(name, "list", other)),
        }
    }

    /// Returns a mutable nested list, creating it if needed.
    ///
    /// A non-list value with the same name is replaced by an empty list.
    pub fn sublist_mut(&mut self, name: &str) -> &mut ParameterList {
        let entry = self
            .0
            .entry(name.to_owned())
            .or_insert_with(|| Parameter::List(ParameterList::new()));

        if !matches!(entry, Parameter::List(_)) {
            *entry = Parameter::List(ParameterList::new());
        }

        match entry {
            Parameter::List(list) => list,
            _ => unreachable!("entry was just made a list"),
        }
    }

    /// Checks that every name in the list appears in `valid`.
    ///
    /// `path` is the key path of this list, used to report the full path of
    /// an unrecognized name.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Unknown`] for the first unrecognized name.
    pub fn check_names(&self, path: &str, valid: &[&str]) -> Result<(), ParamError> {
        match self.names().find(|name| !valid.contains(name)) {
            Some(name) => Err(ParamError::Unknown {
                path: key_path(path, name),
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for ParameterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Joins a parent key path and a name with [`PATH_SEPARATOR`].
#[must_use]
pub fn key_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent}{PATH_SEPARATOR}{name}")
    }
}

fn mismatch(name: &str, expected: &'static str, found: &Parameter) -> ParamError {
    ParamError::TypeMismatch {
        name: name.to_owned(),
        expected,
        found: found.type_name(),
    }
}
