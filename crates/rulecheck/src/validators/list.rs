//! Allowed-value list membership

use serde_json::Value;

use super::ValidationRule;
use crate::error::{ConfigError, RuleResult, ValidationError};
use crate::value::FieldValue;

/// Validator for the `list` member: the value must equal one of the entries
#[derive(Debug, Clone)]
pub struct ListValidator {
    pub allowed: Vec<FieldValue>,
}

impl ListValidator {
    pub fn new(allowed: Vec<FieldValue>) -> Self {
        Self { allowed }
    }

    pub fn from_param(field: &str, param: &Value) -> Result<Self, ConfigError> {
        match param {
            Value::Array(items) => Ok(Self::new(items.iter().map(FieldValue::from).collect())),
            _ => Err(ConfigError::ListNotSequence {
                field: field.to_string(),
            }),
        }
    }
}

impl ValidationRule for ListValidator {
    fn validate(&self, value: &FieldValue, field: &str) -> RuleResult {
        if self.allowed.iter().any(|allowed| allowed == value) {
            return Ok(());
        }

        let allowed: Vec<String> = self.allowed.iter().map(ToString::to_string).collect();
        Err(ValidationError::with_code(
            field,
            format!("{} must be one of: {}", field, allowed.join(", ")),
            "not_in_list",
        )
        .into())
    }

    fn rule_name(&self) -> &'static str {
        "list"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleFailure;
    use serde_json::json;

    #[test]
    fn test_membership() {
        let validator = ListValidator::from_param("role", &json!(["user", "admin", 3])).unwrap();

        assert!(validator.validate(&FieldValue::from("admin"), "role").is_ok());
        assert!(validator.validate(&FieldValue::from(3), "role").is_ok());
        assert!(validator.validate(&FieldValue::from("root"), "role").is_err());
    }

    #[test]
    fn test_comparison_is_by_value_and_kind() {
        let validator = ListValidator::from_param("code", &json!([1, 2, 3])).unwrap();
        assert!(validator.validate(&FieldValue::from(2.0), "code").is_ok());
        assert!(validator.validate(&FieldValue::from("2"), "code").is_err());
        assert!(validator.validate(&FieldValue::Null, "code").is_err());
    }

    #[test]
    fn test_default_message() {
        let validator = ListValidator::from_param("role", &json!(["user", "admin"])).unwrap();
        match validator.validate(&FieldValue::from("root"), "role") {
            Err(RuleFailure::Invalid(error)) => {
                assert_eq!(error.message, "role must be one of: user, admin")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_non_array_param_is_config_error() {
        assert!(matches!(
            ListValidator::from_param("role", &json!("user,admin")),
            Err(ConfigError::ListNotSequence { .. })
        ));
    }
}
