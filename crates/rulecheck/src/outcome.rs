//! The result contract returned to callers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of validating a record.
///
/// `message` is the success message, the first failure's message, or absent
/// when the rule set itself is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: Some(message.into()),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }

    /// Rejection caused by the rule definitions rather than the data
    pub fn misconfigured() -> Self {
        Self {
            valid: false,
            message: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_configuration_error(&self) -> bool {
        !self.valid && self.message.is_none()
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, self.valid) {
            (Some(message), _) => f.write_str(message),
            (None, true) => f.write_str("valid"),
            (None, false) => f.write_str("invalid rule configuration"),
        }
    }
}
