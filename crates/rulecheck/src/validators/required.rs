//! Required field validator

use serde_json::Value;

use super::ValidationRule;
use crate::error::{ConfigError, RuleResult, ValidationError};
use crate::value::FieldValue;

/// Message for a required field that is missing or empty
pub fn required_message(field: &str) -> String {
    format!("Field '{}' must have a value assigned", field)
}

/// Validator that ensures a present field is not empty
#[derive(Debug, Clone)]
pub struct RequiredValidator {
    pub required: bool,
    /// Whether whitespace-only strings count as empty
    pub trim_blank_strings: bool,
}

impl RequiredValidator {
    pub fn new(required: bool) -> Self {
        Self {
            required,
            trim_blank_strings: true,
        }
    }

    pub fn trim_blank_strings(mut self, trim: bool) -> Self {
        self.trim_blank_strings = trim;
        self
    }

    pub fn from_param(field: &str, param: &Value) -> Result<Self, ConfigError> {
        param
            .as_bool()
            .map(Self::new)
            .ok_or_else(|| ConfigError::InvalidRequired {
                field: field.to_string(),
            })
    }

    /// Check if a value is considered empty
    fn is_empty(&self, value: &FieldValue) -> bool {
        match value {
            FieldValue::Null => true,
            FieldValue::String(s) if self.trim_blank_strings => s.trim().is_empty(),
            FieldValue::String(s) => s.is_empty(),
            FieldValue::Array(items) => items.is_empty(),
            FieldValue::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

impl ValidationRule for RequiredValidator {
    fn validate(&self, value: &FieldValue, field: &str) -> RuleResult {
        if self.required && self.is_empty(value) {
            return Err(ValidationError::with_code(field, required_message(field), "required").into());
        }
        Ok(())
    }

    fn rule_name(&self) -> &'static str {
        "required"
    }
}
