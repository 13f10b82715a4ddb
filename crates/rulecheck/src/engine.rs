//! Record evaluation and the public validation entry points

use std::borrow::Cow;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::EngineConfig;
use crate::dispatch::Dispatcher;
use crate::error::{ConfigError, EngineError, RuleFailure, ValidationError};
use crate::outcome::ValidationOutcome;
use crate::registry::CustomRuleRegistry;
use crate::rules::RuleSet;
use crate::value::{record_from_json, Record};

/// Validates records against rule sets.
///
/// Holds the custom-rule registry and configuration; both are read-only, so
/// one validator can be shared across threads and reused for any number of
/// calls.
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Arc<CustomRuleRegistry>,
    config: EngineConfig,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(Arc::new(CustomRuleRegistry::new()))
    }
}

impl Validator {
    pub fn new(registry: Arc<CustomRuleRegistry>) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    pub fn with_config(registry: Arc<CustomRuleRegistry>, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// A validator backed by the process-wide registry
    pub fn global() -> Self {
        Self::new(CustomRuleRegistry::global())
    }

    pub fn registry(&self) -> &CustomRuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate `record` against `rules`.
    ///
    /// Never panics: a fault during evaluation is logged and reported as a
    /// generic failure.
    pub fn validate(
        &self,
        record: &Record,
        rules: &RuleSet,
        allowed_fields: Option<&[String]>,
    ) -> ValidationOutcome {
        self.guarded(|| self.evaluate(record, rules, allowed_fields))
    }

    /// Run `evaluation`, turning a panic into the generic failure outcome
    pub(crate) fn guarded<F>(&self, evaluation: F) -> ValidationOutcome
    where
        F: FnOnce() -> ValidationOutcome,
    {
        match panic::catch_unwind(AssertUnwindSafe(evaluation)) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let fault = EngineError::from_panic(payload);
                error!("Validation aborted: {}", fault);
                ValidationOutcome::invalid(self.config.get_unknown_error_message().clone())
            }
        }
    }

    /// Validate loosely typed JSON input.
    ///
    /// A record or rule set that is not a JSON object, or allowed fields that
    /// are not an array of strings, reject the call as misconfigured.
    pub fn validate_json(
        &self,
        record: &Value,
        rules: &Value,
        allowed_fields: Option<&Value>,
    ) -> ValidationOutcome {
        let parsed = record_from_json(record).and_then(|record| {
            let rules = RuleSet::from_json(rules)?;
            let allowed = allowed_fields.map(allowed_from_json).transpose()?;
            Ok((record, rules, allowed))
        });

        match parsed {
            Ok((record, rules, allowed)) => self.validate(&record, &rules, allowed.as_deref()),
            Err(err) => {
                warn!("Rejected validation input: {}", err);
                ValidationOutcome::misconfigured()
            }
        }
    }

    /// Run the record evaluator without the panic boundary
    pub fn evaluate(
        &self,
        record: &Record,
        rules: &RuleSet,
        allowed_fields: Option<&[String]>,
    ) -> ValidationOutcome {
        match self.first_failure(record, rules, allowed_fields) {
            Ok(()) => ValidationOutcome::ok(self.config.get_ok_message().clone()),
            Err(RuleFailure::Invalid(failure)) => {
                debug!(
                    "Validation failed on field '{}' ({}): {}",
                    failure.field, failure.code, failure.message
                );
                ValidationOutcome::invalid(failure.message)
            }
            Err(RuleFailure::Config(err)) => {
                warn!("Invalid validation rule: {}", err);
                ValidationOutcome::misconfigured()
            }
        }
    }

    fn first_failure(
        &self,
        record: &Record,
        rules: &RuleSet,
        allowed_fields: Option<&[String]>,
    ) -> Result<(), RuleFailure> {
        let dispatcher = Dispatcher::new(&self.registry, &self.config);
        let allowlist = allowed_fields.filter(|allowed| !allowed.is_empty());
        let mut seen: HashSet<&str> = HashSet::new();

        for (field, value) in record {
            if let Some(allowed) = allowlist {
                if !allowed.iter().any(|name| name == field) {
                    return Err(ValidationError::with_code(
                        field.as_str(),
                        format!("'{}' is not a valid field for this request", field),
                        "field_not_allowed",
                    )
                    .into());
                }
            }

            let Some(rule) = rules.get(field) else {
                continue;
            };

            let rule = dispatcher.resolve(field, rule)?;
            dispatcher.check_field(field, &rule, value)?;
            seen.insert(field.as_str());
        }

        for (field, rule) in rules.iter() {
            if seen.contains(field) {
                continue;
            }
            // An absent field only matters if its rule makes it required
            let rule = match dispatcher.resolve(field, rule) {
                Ok(rule) => rule,
                Err(err) => {
                    warn!("Ignoring bundle for absent field '{}': {}", field, err);
                    Cow::Borrowed(rule)
                }
            };
            dispatcher.check_missing(field, &rule)?;
        }

        debug!("Validated {} field(s) against {} rule(s)", record.len(), rules.len());
        Ok(())
    }
}

fn allowed_from_json(value: &Value) -> Result<Vec<String>, ConfigError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or(ConfigError::InvalidAllowedFields)
            })
            .collect(),
        _ => Err(ConfigError::InvalidAllowedFields),
    }
}

/// Validate with the process-wide custom-rule registry
pub fn validate(
    record: &Record,
    rules: &RuleSet,
    allowed_fields: Option<&[String]>,
) -> ValidationOutcome {
    Validator::global().validate(record, rules, allowed_fields)
}

/// [`validate`] for loosely typed JSON input
pub fn validate_json(record: &Value, rules: &Value, allowed_fields: Option<&Value>) -> ValidationOutcome {
    Validator::global().validate_json(record, rules, allowed_fields)
}
