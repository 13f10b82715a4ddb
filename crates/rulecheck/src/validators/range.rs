//! Numeric and date range bounds

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use super::ValidationRule;
use crate::error::{ConfigError, RuleResult, ValidationError};
use crate::message::param_string;
use crate::value::{parse_date, FieldValue};

/// Validator for the `range` member.
///
/// Bounds are interpreted against the value: numbers for numbers, dates for
/// dates and date strings. Out-of-order bounds are swapped before checking,
/// but messages quote the bounds as they were configured.
#[derive(Debug, Clone)]
pub struct RangeValidator {
    min: Option<Value>,
    max: Option<Value>,
}

enum Violation {
    Below,
    Above,
}

impl RangeValidator {
    pub fn new(min: Option<Value>, max: Option<Value>) -> Self {
        Self {
            min: min.filter(|bound| !bound.is_null()),
            max: max.filter(|bound| !bound.is_null()),
        }
    }

    pub fn from_param(field: &str, param: &Value) -> Result<Self, ConfigError> {
        let bounds: &Map<String, Value> =
            param.as_object().ok_or_else(|| ConfigError::InvalidRange {
                field: field.to_string(),
                reason: "expected an object with min and/or max".to_string(),
            })?;

        Ok(Self::new(bounds.get("min").cloned(), bounds.get("max").cloned()))
    }

    fn numeric_bound(field: &str, side: &str, bound: Option<&Value>) -> Result<Option<f64>, ConfigError> {
        match bound {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(_) => Err(ConfigError::InvalidRange {
                field: field.to_string(),
                reason: format!("{} must be a number for a numeric value", side),
            }),
        }
    }

    fn date_bound(field: &str, bound: Option<&Value>) -> Result<Option<DateTime<Utc>>, ConfigError> {
        let Some(bound) = bound else {
            return Ok(None);
        };

        // Numeric date bounds are epoch milliseconds
        let parsed = match bound {
            Value::String(s) => parse_date(s),
            Value::Number(n) => n
                .as_i64()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
            _ => None,
        };

        parsed
            .map(Some)
            .ok_or_else(|| ConfigError::UnparseableDateBound {
                field: field.to_string(),
                bound: param_string(bound),
            })
    }

    fn no_usable_bound(field: &str) -> ConfigError {
        ConfigError::InvalidRange {
            field: field.to_string(),
            reason: "at least one of min and max must be set".to_string(),
        }
    }

    /// Check `value` against bounds, swapping them if configured backwards
    fn check<T: PartialOrd + Copy>(value: T, min: Option<T>, max: Option<T>) -> Option<Violation> {
        let (low, high) = match (min, max) {
            (Some(min), Some(max)) if min > max => (Some(max), Some(min)),
            bounds => bounds,
        };

        if low.is_some_and(|low| value < low) {
            Some(Violation::Below)
        } else if high.is_some_and(|high| value > high) {
            Some(Violation::Above)
        } else {
            None
        }
    }

    fn check_date(&self, date: DateTime<Utc>, field: &str) -> Result<Option<Violation>, ConfigError> {
        let min = Self::date_bound(field, self.min.as_ref())?;
        let max = Self::date_bound(field, self.max.as_ref())?;
        if min.is_none() && max.is_none() {
            return Err(Self::no_usable_bound(field));
        }
        Ok(Self::check(date, min, max))
    }

    fn violation_error(&self, violation: Violation, field: &str) -> ValidationError {
        let configured = |bound: &Option<Value>| bound.as_ref().map(param_string).unwrap_or_default();
        match violation {
            Violation::Below => ValidationError::with_code(
                field,
                format!("{} must be greater than or equal to {}", field, configured(&self.min)),
                "below_minimum",
            ),
            Violation::Above => ValidationError::with_code(
                field,
                format!("{} must be less than or equal to {}", field, configured(&self.max)),
                "above_maximum",
            ),
        }
    }
}

impl ValidationRule for RangeValidator {
    fn validate(&self, value: &FieldValue, field: &str) -> RuleResult {
        let violation = match value {
            FieldValue::Null => return Ok(()),
            FieldValue::Number(n) => {
                let min = Self::numeric_bound(field, "min", self.min.as_ref())?;
                let max = Self::numeric_bound(field, "max", self.max.as_ref())?;
                if min.is_none() && max.is_none() {
                    return Err(Self::no_usable_bound(field).into());
                }
                Self::check(*n, min, max)
            }
            FieldValue::Date(date) => self.check_date(*date, field)?,
            FieldValue::String(s) => match parse_date(s) {
                Some(date) => self.check_date(date, field)?,
                None => {
                    return Err(ValidationError::with_code(
                        field,
                        format!("{} must be a valid date", field),
                        "invalid_date",
                    )
                    .into());
                }
            },
            _ => {
                return Err(ValidationError::with_code(
                    field,
                    format!("{} must be a number or date for range validation", field),
                    "invalid_type",
                )
                .into());
            }
        };

        match violation {
            Some(violation) => Err(self.violation_error(violation, field).into()),
            None => Ok(()),
        }
    }

    fn rule_name(&self) -> &'static str {
        "range"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleFailure;
    use serde_json::json;

    fn validator(param: Value) -> RangeValidator {
        RangeValidator::from_param("f", &param).unwrap()
    }

    fn message(result: RuleResult) -> String {
        match result {
            Err(RuleFailure::Invalid(error)) => error.message,
            other => panic!("expected a data failure, got {:?}", other),
        }
    }

    fn is_config_error(result: RuleResult) -> bool {
        matches!(result, Err(RuleFailure::Config(_)))
    }

    #[test]
    fn test_numeric_bounds() {
        let range = validator(json!({"min": 18, "max": 65}));
        assert!(range.validate(&FieldValue::from(18), "age").is_ok());
        assert!(range.validate(&FieldValue::from(65), "age").is_ok());
        assert_eq!(
            message(range.validate(&FieldValue::from(15), "age")),
            "age must be greater than or equal to 18"
        );
        assert_eq!(
            message(range.validate(&FieldValue::from(66), "age")),
            "age must be less than or equal to 65"
        );
    }

    #[test]
    fn test_single_bound() {
        let range = validator(json!({"max": 10}));
        assert!(range.validate(&FieldValue::from(-100), "n").is_ok());
        assert!(range.validate(&FieldValue::from(11), "n").is_err());
    }

    #[test]
    fn test_swapped_bounds_pass_the_same_values() {
        let ordered = validator(json!({"min": 1, "max": 10}));
        let swapped = validator(json!({"min": 10, "max": 1}));
        for n in [0, 1, 5, 10, 11] {
            let value = FieldValue::from(n);
            assert_eq!(
                ordered.validate(&value, "n").is_ok(),
                swapped.validate(&value, "n").is_ok(),
                "disagreement at {}",
                n
            );
        }
    }

    #[test]
    fn test_swapped_bounds_echo_configured_values() {
        let swapped = validator(json!({"min": 10, "max": 1}));
        assert_eq!(
            message(swapped.validate(&FieldValue::from(0), "n")),
            "n must be greater than or equal to 10"
        );
        assert_eq!(
            message(swapped.validate(&FieldValue::from(11), "n")),
            "n must be less than or equal to 1"
        );
    }

    #[test]
    fn test_date_bounds() {
        let range = validator(json!({"min": "2024-01-01", "max": "2024-12-31"}));
        assert!(range.validate(&FieldValue::from("2024-06-15"), "start").is_ok());
        assert_eq!(
            message(range.validate(&FieldValue::from("2023-12-31"), "start")),
            "start must be greater than or equal to 2024-01-01"
        );
        assert!(range.validate(&FieldValue::from("2025-01-01"), "start").is_err());

        let native = parse_date("2024-03-01").unwrap();
        assert!(range.validate(&FieldValue::from(native), "start").is_ok());
    }

    #[test]
    fn test_unparseable_date_value_is_data_failure() {
        let range = validator(json!({"min": "2024-01-01"}));
        assert_eq!(
            message(range.validate(&FieldValue::from("soon"), "start")),
            "start must be a valid date"
        );
    }

    #[test]
    fn test_configuration_errors() {
        assert!(RangeValidator::from_param("f", &json!(5)).is_err());

        let unparseable_bound = validator(json!({"min": "someday"}));
        assert!(is_config_error(unparseable_bound.validate(&FieldValue::from("2024-01-01"), "f")));

        let string_bound_for_number = validator(json!({"min": "1"}));
        assert!(is_config_error(string_bound_for_number.validate(&FieldValue::from(5), "f")));

        let no_bounds = validator(json!({}));
        assert!(is_config_error(no_bounds.validate(&FieldValue::from(5), "f")));
    }

    #[test]
    fn test_other_kinds_fail_and_null_is_skipped() {
        let range = validator(json!({"min": 1}));
        assert!(range.validate(&FieldValue::Null, "f").is_ok());
        assert_eq!(
            message(range.validate(&FieldValue::from(true), "f")),
            "f must be a number or date for range validation"
        );
    }
}
