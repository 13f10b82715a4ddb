//! Built-in primitive validators

use crate::error::RuleResult;
use crate::value::FieldValue;

pub mod data_type;
pub mod length;
pub mod list;
pub mod pattern;
pub mod range;
pub mod required;

/// A single, stateless check of one value.
///
/// Validators are built from a rule member's parameter (where a malformed
/// parameter is a configuration error) and never mutate their inputs.
pub trait ValidationRule {
    /// Validate a single value
    fn validate(&self, value: &FieldValue, field: &str) -> RuleResult;

    /// Get the validation rule name/type
    fn rule_name(&self) -> &'static str;
}
