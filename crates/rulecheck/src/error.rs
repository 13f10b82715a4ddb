//! Validation error types and handling

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result of running one rule member against one field value
pub type RuleResult = Result<(), RuleFailure>;

/// Data failure for a specific field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
    /// Error code for programmatic handling
    pub code: String,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: "validation_failed".to_string(),
        }
    }

    /// Create a validation error with a specific code
    pub fn with_code(
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        }
    }

    /// Replace the message, keeping field and code
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A rule definition that cannot be applied as written.
///
/// These never reach end users as messages: the outcome only says the data
/// was not accepted, and the detail goes to the log for whoever owns the
/// rule set.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{what} must be a JSON object")]
    NotAnObject { what: &'static str },

    #[error("allowed fields must be an array of strings")]
    InvalidAllowedFields,

    #[error("rule for field '{field}' must be an object")]
    InvalidRule { field: String },

    #[error("field '{field}' references a custom rule that is not a string")]
    InvalidCustomReference { field: String },

    #[error("custom rule '{name}' referenced by field '{field}' is not registered")]
    UnknownCustomRule { field: String, name: String },

    #[error("unknown data type '{data_type}' for field '{field}'")]
    UnknownDataType { field: String, data_type: String },

    #[error("list rule for field '{field}' must be an array")]
    ListNotSequence { field: String },

    #[error("invalid len rule for field '{field}': {reason}")]
    InvalidLength { field: String, reason: String },

    #[error("invalid range rule for field '{field}': {reason}")]
    InvalidRange { field: String, reason: String },

    #[error("range bound '{bound}' for field '{field}' is not a valid date")]
    UnparseableDateBound { field: String, bound: String },

    #[error("invalid regex rule for field '{field}': {reason}")]
    InvalidPattern { field: String, reason: String },

    #[error("required rule for field '{field}' must be a boolean")]
    InvalidRequired { field: String },
}

/// Why a rule member rejected a value
#[derive(Debug)]
pub enum RuleFailure {
    /// The data broke the rule
    Invalid(ValidationError),
    /// The rule itself is malformed
    Config(ConfigError),
}

impl From<ValidationError> for RuleFailure {
    fn from(error: ValidationError) -> Self {
        RuleFailure::Invalid(error)
    }
}

impl From<ConfigError> for RuleFailure {
    fn from(error: ConfigError) -> Self {
        RuleFailure::Config(error)
    }
}

/// Errors raised while loading or installing a custom-rule registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read custom rules from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON custom rules: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML custom rules: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("custom rules must be an object mapping names to rule objects")]
    NotAnObject,

    #[error("custom rule '{name}' must be an object")]
    InvalidBundle { name: String },

    #[error("a global custom rule registry is already installed")]
    AlreadyInstalled,
}

/// Faults inside the evaluator itself, caught at the public boundary
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation panicked: {0}")]
    Panicked(String),
}

impl EngineError {
    /// Build from a payload returned by `std::panic::catch_unwind`
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let detail = if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        };
        EngineError::Panicked(detail)
    }
}
