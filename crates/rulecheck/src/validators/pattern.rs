//! Regular-expression match

use regex::Regex;
use serde_json::Value;

use super::ValidationRule;
use crate::error::{ConfigError, RuleResult, ValidationError};
use crate::value::FieldValue;

/// Validator for the `regex` member.
///
/// Matches against the value's string form and succeeds if the pattern
/// matches anywhere; anchor the pattern to require a full match.
#[derive(Debug, Clone)]
pub struct PatternValidator {
    pattern: Regex,
}

impl PatternValidator {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn from_param(field: &str, param: &Value) -> Result<Self, ConfigError> {
        let pattern = param.as_str().ok_or_else(|| ConfigError::InvalidPattern {
            field: field.to_string(),
            reason: "pattern must be a string".to_string(),
        })?;

        Self::new(pattern).map_err(|err| ConfigError::InvalidPattern {
            field: field.to_string(),
            reason: err.to_string(),
        })
    }

    /// Get the pattern string
    pub fn pattern_string(&self) -> &str {
        self.pattern.as_str()
    }
}

impl ValidationRule for PatternValidator {
    fn validate(&self, value: &FieldValue, field: &str) -> RuleResult {
        // Skip validation for null values
        if value.is_null() {
            return Ok(());
        }

        if self.pattern.is_match(&value.to_string()) {
            return Ok(());
        }

        Err(ValidationError::with_code(
            field,
            format!("{} does not match the required pattern", field),
            "pattern_mismatch",
        )
        .into())
    }

    fn rule_name(&self) -> &'static str {
        "regex"
    }
}
