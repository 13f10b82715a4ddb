//! Runtime type check

use serde_json::Value;
use std::fmt;

use super::ValidationRule;
use crate::error::{ConfigError, RuleResult, ValidationError};
use crate::value::{parse_date, FieldValue};

/// The data types a `dataType` member may name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    String,
    Number,
    Date,
    Boolean,
    Object,
    Array,
}

impl DataType {
    /// Case-insensitive lookup of a type name
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "string" => Some(DataType::String),
            "number" => Some(DataType::Number),
            "date" => Some(DataType::Date),
            "boolean" => Some(DataType::Boolean),
            "object" => Some(DataType::Object),
            "array" => Some(DataType::Array),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Date => "date",
            DataType::Boolean => "boolean",
            DataType::Object => "object",
            DataType::Array => "array",
        }
    }

    /// Whether `value` is of this type. Dates also accept parseable strings.
    pub fn matches(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (DataType::String, FieldValue::String(_)) => true,
            (DataType::Number, FieldValue::Number(_)) => true,
            (DataType::Boolean, FieldValue::Bool(_)) => true,
            (DataType::Object, FieldValue::Object(_)) => true,
            (DataType::Array, FieldValue::Array(_)) => true,
            (DataType::Date, FieldValue::Date(_)) => true,
            (DataType::Date, FieldValue::String(s)) => parse_date(s).is_some(),
            _ => false,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validator for the `dataType` member
#[derive(Debug, Clone)]
pub struct DataTypeValidator {
    pub data_type: DataType,
}

impl DataTypeValidator {
    pub fn new(data_type: DataType) -> Self {
        Self { data_type }
    }

    pub fn from_param(field: &str, param: &Value) -> Result<Self, ConfigError> {
        param
            .as_str()
            .and_then(DataType::parse)
            .map(Self::new)
            .ok_or_else(|| ConfigError::UnknownDataType {
                field: field.to_string(),
                data_type: crate::message::param_string(param),
            })
    }
}

impl ValidationRule for DataTypeValidator {
    fn validate(&self, value: &FieldValue, field: &str) -> RuleResult {
        if self.data_type.matches(value) {
            return Ok(());
        }

        Err(ValidationError::with_code(
            field,
            format!("{} must be of type {}", field, self.data_type),
            "invalid_type",
        )
        .into())
    }

    fn rule_name(&self) -> &'static str {
        "dataType"
    }
}
