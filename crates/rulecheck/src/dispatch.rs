//! Rule dispatch: resolves custom bundles and runs a field's members in order

use std::borrow::Cow;

use serde_json::Value;
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::{ConfigError, RuleFailure, RuleResult, ValidationError};
use crate::message;
use crate::registry::CustomRuleRegistry;
use crate::rules::{FieldRule, RuleKind};
use crate::validators::data_type::DataTypeValidator;
use crate::validators::length::LengthValidator;
use crate::validators::list::ListValidator;
use crate::validators::pattern::PatternValidator;
use crate::validators::range::RangeValidator;
use crate::validators::required::{required_message, RequiredValidator};
use crate::validators::ValidationRule;
use crate::value::FieldValue;

/// Applies field rules against values using a registry and engine config
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    registry: &'a CustomRuleRegistry,
    config: &'a EngineConfig,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a CustomRuleRegistry, config: &'a EngineConfig) -> Self {
        Self { registry, config }
    }

    /// The effective rule for a field: itself, or itself laid over its bundle
    pub fn resolve<'r>(&self, field: &str, rule: &'r FieldRule) -> Result<Cow<'r, FieldRule>, ConfigError> {
        let Some(name) = rule.custom_name(field)? else {
            return Ok(Cow::Borrowed(rule));
        };

        let bundle = self
            .registry
            .get(name)
            .ok_or_else(|| ConfigError::UnknownCustomRule {
                field: field.to_string(),
                name: name.to_string(),
            })?;

        debug!("Field '{}' uses custom rule '{}'", field, name);
        Ok(Cow::Owned(rule.merged_over(bundle)))
    }

    /// Run every recognized member of `rule` against `value`, stopping at
    /// the first failure
    pub fn check_field(&self, field: &str, rule: &FieldRule, value: &FieldValue) -> RuleResult {
        for (name, param) in rule.members() {
            let Some(kind) = RuleKind::parse(name) else {
                continue;
            };

            match self.run(kind, field, param, value) {
                Ok(()) => {}
                Err(RuleFailure::Invalid(error)) => {
                    return Err(apply_template(rule, name, kind, param, value, error).into());
                }
                Err(failure) => return Err(failure),
            }
        }
        Ok(())
    }

    /// Failure for a rule-set field that is absent from the record, if the
    /// rule requires it
    pub fn check_missing(&self, field: &str, rule: &FieldRule) -> RuleResult {
        let Some((name, param)) = rule.get(RuleKind::Required) else {
            return Ok(());
        };

        if !RequiredValidator::from_param(field, param)?.required {
            return Ok(());
        }

        let error = ValidationError::with_code(field, required_message(field), "required");
        Err(apply_template(rule, name, RuleKind::Required, param, &FieldValue::Null, error).into())
    }

    fn run(&self, kind: RuleKind, field: &str, param: &Value, value: &FieldValue) -> RuleResult {
        match kind {
            RuleKind::DataType => DataTypeValidator::from_param(field, param)?.validate(value, field),
            RuleKind::List => ListValidator::from_param(field, param)?.validate(value, field),
            RuleKind::Len => LengthValidator::from_param(field, param)?.validate(value, field),
            RuleKind::Range => RangeValidator::from_param(field, param)?.validate(value, field),
            RuleKind::Regex => PatternValidator::from_param(field, param)?.validate(value, field),
            RuleKind::Required => RequiredValidator::from_param(field, param)?
                .trim_blank_strings(*self.config.get_trim_blank_strings())
                .validate(value, field),
            RuleKind::Custom | RuleKind::Message => Ok(()),
        }
    }
}

/// Swap in the rule's own message template for `member`, if it has one.
/// Placeholders use the canonical rule name whatever the member's spelling.
fn apply_template(
    rule: &FieldRule,
    member: &str,
    kind: RuleKind,
    param: &Value,
    value: &FieldValue,
    error: ValidationError,
) -> ValidationError {
    match rule.template_for(member) {
        Some(template) => {
            let rendered = message::render(template, &error.field, value, kind.as_str(), param);
            error.message(rendered)
        }
        None => error,
    }
}
