//! Rule definitions: per-field rules and the rule set that maps fields to them

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::ConfigError;
use crate::validators::data_type::DataType;

/// The closed set of rule member names the engine understands.
///
/// Names are matched case-insensitively, so `dataType`, `datatype` and
/// `DATATYPE` all resolve to [`RuleKind::DataType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    DataType,
    List,
    Len,
    Range,
    Regex,
    Required,
    Custom,
    Message,
}

impl RuleKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "datatype" => Some(RuleKind::DataType),
            "list" => Some(RuleKind::List),
            "len" => Some(RuleKind::Len),
            "range" => Some(RuleKind::Range),
            "regex" => Some(RuleKind::Regex),
            "required" => Some(RuleKind::Required),
            "custom" => Some(RuleKind::Custom),
            "message" => Some(RuleKind::Message),
            _ => None,
        }
    }

    /// Canonical member name, as written by the builder methods
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::DataType => "dataType",
            RuleKind::List => "list",
            RuleKind::Len => "len",
            RuleKind::Range => "range",
            RuleKind::Regex => "regex",
            RuleKind::Required => "required",
            RuleKind::Custom => "custom",
            RuleKind::Message => "message",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraints declared for one field.
///
/// Members keep their declaration order, which is the order the dispatcher
/// applies them in. Parameters stay as raw JSON until a validator parses
/// them, so a malformed parameter surfaces as a [`ConfigError`] at
/// validation time rather than being silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRule {
    members: IndexMap<String, Value>,
}

impl FieldRule {
    /// Create an empty rule. An empty rule accepts any value.
    pub fn new() -> Self {
        Self {
            members: IndexMap::new(),
        }
    }

    /// Build a rule from a JSON object
    pub fn from_json(field: &str, value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            _ => Err(ConfigError::InvalidRule {
                field: field.to_string(),
            }),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        Self {
            members: map
                .iter()
                .map(|(name, param)| (name.clone(), param.clone()))
                .collect(),
        }
    }

    /// All members in declaration order, including unrecognized ones
    pub fn members(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.members.iter().map(|(name, param)| (name.as_str(), param))
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// First member whose name resolves to `kind`
    pub fn get(&self, kind: RuleKind) -> Option<(&str, &Value)> {
        self.members()
            .find(|(name, _)| RuleKind::parse(name) == Some(kind))
    }

    /// Whether the rule demands a value for its field
    pub fn is_required(&self) -> bool {
        matches!(self.get(RuleKind::Required), Some((_, Value::Bool(true))))
    }

    /// Name of the custom bundle this rule builds on, if any
    pub fn custom_name(&self, field: &str) -> Result<Option<&str>, ConfigError> {
        match self.get(RuleKind::Custom) {
            None | Some((_, Value::Null)) => Ok(None),
            Some((_, Value::String(name))) => Ok(Some(name.as_str())),
            Some(_) => Err(ConfigError::InvalidCustomReference {
                field: field.to_string(),
            }),
        }
    }

    /// Message template for a failing member.
    ///
    /// Looks for a template under the member's own name, then under
    /// `custom`, which acts as the catch-all template for the field.
    pub fn template_for(&self, member: &str) -> Option<&str> {
        let messages = match self.get(RuleKind::Message) {
            Some((_, Value::Object(messages))) => messages,
            _ => return None,
        };

        let lookup = |name: &str| {
            messages
                .get(name)
                .or_else(|| {
                    messages
                        .iter()
                        .find(|(key, _)| key.eq_ignore_ascii_case(name))
                        .map(|(_, template)| template)
                })
                .and_then(Value::as_str)
        };

        lookup(member).or_else(|| lookup(RuleKind::Custom.as_str()))
    }

    /// Lay this rule over a custom bundle.
    ///
    /// Produces a new rule; neither input is touched. Bundle members come
    /// first in their own order, explicit members override same-named ones
    /// in place and append the rest.
    pub fn merged_over(&self, bundle: &FieldRule) -> FieldRule {
        let mut members = bundle.members.clone();
        for (name, param) in &self.members {
            let existing = members
                .keys()
                .find(|key| key.eq_ignore_ascii_case(name))
                .cloned();
            match existing {
                Some(key) => {
                    members.insert(key, param.clone());
                }
                None => {
                    members.insert(name.clone(), param.clone());
                }
            }
        }
        FieldRule { members }
    }

    /// Set a raw member, replacing any earlier value under that name
    pub fn member(mut self, name: impl Into<String>, param: impl Into<Value>) -> Self {
        self.members.insert(name.into(), param.into());
        self
    }

    pub fn data_type(self, data_type: DataType) -> Self {
        self.member(RuleKind::DataType.as_str(), data_type.as_str())
    }

    pub fn list<I, V>(self, allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let allowed: Vec<Value> = allowed.into_iter().map(Into::into).collect();
        self.member(RuleKind::List.as_str(), Value::Array(allowed))
    }

    /// Length bounds; `0` leaves a side open
    pub fn len(self, min: usize, max: usize) -> Self {
        self.member(
            RuleKind::Len.as_str(),
            serde_json::json!({ "min": min, "max": max }),
        )
    }

    /// Numeric or date bounds (date bounds as strings)
    pub fn range(self, min: impl Into<Value>, max: impl Into<Value>) -> Self {
        let mut bounds = Map::new();
        bounds.insert("min".to_string(), min.into());
        bounds.insert("max".to_string(), max.into());
        self.member(RuleKind::Range.as_str(), Value::Object(bounds))
    }

    pub fn range_min(self, min: impl Into<Value>) -> Self {
        self.bound(RuleKind::Range, "min", min.into())
    }

    pub fn range_max(self, max: impl Into<Value>) -> Self {
        self.bound(RuleKind::Range, "max", max.into())
    }

    pub fn min_len(self, min: usize) -> Self {
        self.bound(RuleKind::Len, "min", Value::from(min))
    }

    pub fn max_len(self, max: usize) -> Self {
        self.bound(RuleKind::Len, "max", Value::from(max))
    }

    fn bound(mut self, kind: RuleKind, side: &str, bound: Value) -> Self {
        let entry = self
            .members
            .entry(kind.as_str().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(bounds) = entry {
            bounds.insert(side.to_string(), bound);
        }
        self
    }

    pub fn required(self, required: bool) -> Self {
        self.member(RuleKind::Required.as_str(), required)
    }

    pub fn regex(self, pattern: impl Into<String>) -> Self {
        self.member(RuleKind::Regex.as_str(), pattern.into())
    }

    pub fn custom(self, name: impl Into<String>) -> Self {
        self.member(RuleKind::Custom.as_str(), name.into())
    }

    /// Message template for one rule name (or `custom` for any)
    pub fn message(mut self, rule: impl Into<String>, template: impl Into<String>) -> Self {
        let entry = self
            .members
            .entry(RuleKind::Message.as_str().to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(messages) = entry {
            messages.insert(rule.into(), Value::String(template.into()));
        }
        self
    }
}

/// Field name to rule, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    fields: IndexMap<String, FieldRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
        }
    }

    /// Build a rule set from a JSON object of rule objects
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        let map = value
            .as_object()
            .ok_or(ConfigError::NotAnObject { what: "rule set" })?;

        let mut rules = RuleSet::new();
        for (field, rule) in map {
            rules.insert(field.clone(), FieldRule::from_json(field, rule)?);
        }
        Ok(rules)
    }

    /// Add a rule for a field
    pub fn field(mut self, field: impl Into<String>, rule: FieldRule) -> Self {
        self.insert(field, rule);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, rule: FieldRule) {
        self.fields.insert(field.into(), rule);
    }

    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(field, rule)| (field.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rule_kind_is_case_insensitive() {
        assert_eq!(RuleKind::parse("dataType"), Some(RuleKind::DataType));
        assert_eq!(RuleKind::parse("DATATYPE"), Some(RuleKind::DataType));
        assert_eq!(RuleKind::parse("Regex"), Some(RuleKind::Regex));
        assert_eq!(RuleKind::parse("email"), None);
    }

    #[test]
    fn test_members_keep_declaration_order() {
        let rule = FieldRule::from_json(
            "age",
            &json!({"range": {"min": 1}, "dataType": "number", "note": "x"}),
        )
        .unwrap();
        let names: Vec<&str> = rule.members().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["range", "dataType", "note"]);
    }

    #[test]
    fn test_non_object_rule_is_config_error() {
        assert!(matches!(
            FieldRule::from_json("age", &json!("number")),
            Err(ConfigError::InvalidRule { .. })
        ));
    }

    #[test]
    fn test_builder_produces_expected_members() {
        let rule = FieldRule::new()
            .data_type(DataType::Number)
            .range_min(18)
            .range_max(65)
            .required(true)
            .message("range", "{field} out of range");

        assert_eq!(
            serde_json::to_value(&rule).unwrap(),
            json!({
                "dataType": "number",
                "range": {"min": 18, "max": 65},
                "required": true,
                "message": {"range": "{field} out of range"}
            })
        );
        assert!(rule.is_required());
    }

    #[test]
    fn test_template_lookup_falls_back_to_custom() {
        let rule = FieldRule::new()
            .message("list", "bad list")
            .message("custom", "generic");
        assert_eq!(rule.template_for("list"), Some("bad list"));
        assert_eq!(rule.template_for("regex"), Some("generic"));

        let plain = FieldRule::new().message("len", "too long");
        assert_eq!(plain.template_for("range"), None);
    }

    #[test]
    fn test_merge_overrides_bundle_without_touching_it() {
        let bundle = FieldRule::new().data_type(DataType::String).len(2, 10);
        let explicit = FieldRule::new().custom("name").len(1, 3).required(true);

        let merged = explicit.merged_over(&bundle);

        assert_eq!(
            serde_json::to_value(&merged).unwrap(),
            json!({
                "dataType": "string",
                "len": {"min": 1, "max": 3},
                "custom": "name",
                "required": true
            })
        );
        assert_eq!(
            serde_json::to_value(&bundle).unwrap(),
            json!({"dataType": "string", "len": {"min": 2, "max": 10}})
        );
    }

    #[test]
    fn test_custom_name_must_be_string() {
        let rule = FieldRule::new().member("custom", 5);
        assert!(rule.custom_name("zip").is_err());
        assert_eq!(FieldRule::new().custom_name("zip").unwrap(), None);
    }

    #[test]
    fn test_rule_set_from_json() {
        let rules = RuleSet::from_json(&json!({
            "name": {"required": true},
            "age": {"dataType": "number"}
        }))
        .unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules.get("name").unwrap().is_required());
        assert!(RuleSet::from_json(&json!([])).is_err());
        assert!(RuleSet::from_json(&json!({"name": true})).is_err());
    }
}
