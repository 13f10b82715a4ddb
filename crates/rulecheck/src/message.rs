//! Message templates for rule failures
//!
//! Templates use brace placeholders: `{field}` and `{value}` everywhere,
//! `{list}` for list rules, `{min}`/`{max}` for `len` and `range`, and
//! `{<rule name>}` (e.g. `{regex}`, `{dataType}`) for the rest. Anything
//! else in braces is left as written.

use serde_json::Value;

use crate::rules::RuleKind;
use crate::value::FieldValue;

/// Render a failure message from a template
pub fn render(
    template: &str,
    field: &str,
    value: &FieldValue,
    rule_name: &str,
    param: &Value,
) -> String {
    let rendered = template
        .replace("{field}", field)
        .replace("{value}", &value.to_string());

    match RuleKind::parse(rule_name) {
        Some(RuleKind::List) => rendered.replace("{list}", &param_string(param)),
        Some(RuleKind::Range) | Some(RuleKind::Len) => {
            let bound = |side: &str| param.get(side).map(param_string).unwrap_or_default();
            rendered
                .replace("{min}", &bound("min"))
                .replace("{max}", &bound("max"))
        }
        _ => rendered.replace(&format!("{{{}}}", rule_name), &param_string(param)),
    }
}

/// String form of a rule parameter: bare strings, comma-joined arrays
pub fn param_string(param: &Value) -> String {
    match param {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(param_string)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_placeholder() {
        let message = render(
            "{field} must be one of {list}",
            "status",
            &FieldValue::from(9),
            "list",
            &json!([1, 2, 3]),
        );
        assert_eq!(message, "status must be one of 1,2,3");
    }

    #[test]
    fn test_range_and_len_placeholders() {
        let message = render(
            "{field}={value} not in [{min}, {max}]",
            "age",
            &FieldValue::from(70),
            "range",
            &json!({"min": 18, "max": 65}),
        );
        assert_eq!(message, "age=70 not in [18, 65]");

        let message = render(
            "{field} needs {min}..{max} chars",
            "name",
            &FieldValue::from("x"),
            "len",
            &json!({"min": 2}),
        );
        assert_eq!(message, "name needs 2.. chars");
    }

    #[test]
    fn test_rule_named_placeholder() {
        let message = render(
            "{field} must match {regex}",
            "code",
            &FieldValue::from("abc"),
            "regex",
            &json!("^[0-9]+$"),
        );
        assert_eq!(message, "code must match ^[0-9]+$");

        let message = render(
            "{field} should be a {dataType}",
            "age",
            &FieldValue::from("x"),
            "dataType",
            &json!("number"),
        );
        assert_eq!(message, "age should be a number");
    }

    #[test]
    fn test_repeated_and_unknown_placeholders() {
        let message = render(
            "{field}/{field} got {value} {unknown}",
            "role",
            &FieldValue::from("root"),
            "list",
            &json!(["user"]),
        );
        assert_eq!(message, "role/role got root {unknown}");
    }
}
