//! Length bounds for strings and arrays

use serde_json::Value;

use super::ValidationRule;
use crate::error::{ConfigError, RuleResult, ValidationError};
use crate::value::{format_number, FieldValue};

/// Validator for the `len` member
#[derive(Debug, Clone, Default)]
pub struct LengthValidator {
    /// Minimum length (inclusive)
    pub min: Option<f64>,
    /// Maximum length (inclusive)
    pub max: Option<f64>,
}

impl LengthValidator {
    /// Bounds of zero or below leave that side open
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min: min.filter(|min| *min > 0.0),
            max: max.filter(|max| *max > 0.0),
        }
    }

    pub fn from_param(field: &str, param: &Value) -> Result<Self, ConfigError> {
        let bounds = param.as_object().ok_or_else(|| ConfigError::InvalidLength {
            field: field.to_string(),
            reason: "expected an object with min and/or max".to_string(),
        })?;

        let bound = |side: &str| -> Result<Option<f64>, ConfigError> {
            match bounds.get(side) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::Number(n)) => Ok(n.as_f64()),
                Some(_) => Err(ConfigError::InvalidLength {
                    field: field.to_string(),
                    reason: format!("{} must be a number", side),
                }),
            }
        };

        Ok(Self::new(bound("min")?, bound("max")?))
    }

    /// Unicode-aware length for strings, item count for arrays
    fn get_length(value: &FieldValue) -> Option<usize> {
        match value {
            FieldValue::String(s) => Some(s.chars().count()),
            FieldValue::Array(items) => Some(items.len()),
            _ => None,
        }
    }

    fn unit(value: &FieldValue) -> &'static str {
        match value {
            FieldValue::Array(_) => "items",
            _ => "characters",
        }
    }
}

impl ValidationRule for LengthValidator {
    fn validate(&self, value: &FieldValue, field: &str) -> RuleResult {
        // Skip validation for null values (required handles those)
        if value.is_null() {
            return Ok(());
        }

        let length = match Self::get_length(value) {
            Some(len) => len as f64,
            None => {
                return Err(ValidationError::with_code(
                    field,
                    format!("{} must be a string or array for length validation", field),
                    "invalid_type",
                )
                .into());
            }
        };

        if let Some(min) = self.min {
            if length < min {
                return Err(ValidationError::with_code(
                    field,
                    format!(
                        "{} must be at least {} {} long",
                        field,
                        format_number(min),
                        Self::unit(value)
                    ),
                    "length_min",
                )
                .into());
            }
        }

        if let Some(max) = self.max {
            if length > max {
                return Err(ValidationError::with_code(
                    field,
                    format!(
                        "{} must be at most {} {} long",
                        field,
                        format_number(max),
                        Self::unit(value)
                    ),
                    "length_max",
                )
                .into());
            }
        }

        Ok(())
    }

    fn rule_name(&self) -> &'static str {
        "len"
    }
}
