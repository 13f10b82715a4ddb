//! # rulecheck
//!
//! Declarative field validation for request records. A rule set maps field
//! names to rules (`dataType`, `list`, `len`, `range`, `regex`, `required`,
//! `custom`, `message`); validation stops at the first violation and returns
//! a single `{valid, message}` outcome.
//!
//! ```
//! use rulecheck::{validate_json, ValidationOutcome};
//! use serde_json::json;
//!
//! let outcome = validate_json(
//!     &json!({"age": 15}),
//!     &json!({"age": {"dataType": "number", "range": {"min": 18, "max": 65}}}),
//!     None,
//! );
//! assert_eq!(
//!     outcome,
//!     ValidationOutcome::invalid("age must be greater than or equal to 18")
//! );
//! ```

pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod message;
pub mod outcome;
pub mod registry;
pub mod rules;
pub mod validators;
pub mod value;

// Re-exports for easy access
pub use config::{EngineConfig, EngineConfigBuilder};
pub use engine::{validate, validate_json, Validator};
pub use error::{ConfigError, EngineError, RegistryError, RuleFailure, RuleResult, ValidationError};
pub use outcome::ValidationOutcome;
pub use registry::CustomRuleRegistry;
pub use rules::{FieldRule, RuleKind, RuleSet};
pub use value::{parse_date, record_from_json, FieldValue, Record};

// Built-in validators
pub use validators::{
    data_type::{DataType, DataTypeValidator},
    length::LengthValidator,
    list::ListValidator,
    pattern::PatternValidator,
    range::RangeValidator,
    required::RequiredValidator,
    ValidationRule,
};
