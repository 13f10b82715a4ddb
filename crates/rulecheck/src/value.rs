//! Record values and their JSON boundary

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::ConfigError;

/// Input record: field name to value, in the caller's order
pub type Record = IndexMap<String, FieldValue>;

/// A single field value, classified once when the record is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<FieldValue>),
    Object(IndexMap<String, FieldValue>),
}

impl FieldValue {
    /// Name of the runtime kind, as used in type-check messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::String(_) => "string",
            FieldValue::Date(_) => "date",
            FieldValue::Array(_) => "array",
            FieldValue::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Convert back into plain JSON. Dates become RFC 3339 strings.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => number_to_json(*n),
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Date(d) => Value::String(format_date(d)),
            FieldValue::Array(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
            FieldValue::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }
}

fn number_to_json(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::Number(serde_json::Number::from(n as i64))
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Render a number the way it reads in messages: `18`, not `18.0`
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The value's string form, used by regex matching and `{value}` placeholders
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", format_number(*n)),
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Date(d) => write!(f, "{}", format_date(d)),
            FieldValue::Array(items) => {
                let parts: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
            FieldValue::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => FieldValue::Array(items.into_iter().map(FieldValue::from).collect()),
            Value::Object(map) => FieldValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, FieldValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        FieldValue::from(value.clone())
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        value.to_json()
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Date(value)
    }
}

impl<T> From<Vec<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(values: Vec<T>) -> Self {
        FieldValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<FieldValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Build a record from a JSON object, keeping its key order
pub fn record_from_json(value: &Value) -> Result<Record, ConfigError> {
    match value {
        Value::Object(map) => Ok(map
            .iter()
            .map(|(key, value)| (key.clone(), FieldValue::from(value)))
            .collect()),
        _ => Err(ConfigError::NotAnObject { what: "record" }),
    }
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %B %Y", "%B %d, %Y"];

/// Parse a date string in any of the common interchange forms.
///
/// Offsets are honoured; naive timestamps and plain dates are taken as UTC.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(input) {
        return Some(date.with_timezone(&Utc));
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    DATE_FORMATS
        .iter()
        .filter_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .chain(parse_partial_date(input))
        .find_map(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `YYYY` or `YYYY-MM`, taken as the first day of the period
fn parse_partial_date(input: &str) -> Option<NaiveDate> {
    let (year, month) = match input.split_once('-') {
        Some((year, month)) => (year, Some(month)),
        None => (input, None),
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if year.len() != 4 || !all_digits(year) {
        return None;
    }

    let month = match month {
        Some(month) if month.len() <= 2 && all_digits(month) => month.parse().ok()?,
        Some(_) => return None,
        None => 1,
    };

    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use serde_json::json;

    #[test]
    fn test_from_json_classifies_values() {
        assert_eq!(FieldValue::from(json!(null)), FieldValue::Null);
        assert_eq!(FieldValue::from(json!(true)), FieldValue::Bool(true));
        assert_eq!(FieldValue::from(json!(42)), FieldValue::Number(42.0));
        assert_eq!(FieldValue::from(json!("hi")), FieldValue::String("hi".to_string()));
        assert_eq!(
            FieldValue::from(json!([1, "a"])),
            FieldValue::Array(vec![FieldValue::Number(1.0), FieldValue::from("a")])
        );
        assert_eq!(FieldValue::from(json!({"a": 1})).kind_name(), "object");
    }

    #[test]
    fn test_string_form() {
        assert_eq!(FieldValue::from(18).to_string(), "18");
        assert_eq!(FieldValue::from(2.5).to_string(), "2.5");
        assert_eq!(FieldValue::from(vec![1, 2, 3]).to_string(), "1,2,3");
        assert_eq!(FieldValue::Null.to_string(), "null");
        assert_eq!(FieldValue::from(json!({"a": 1})).to_string(), r#"{"a":1}"#);
    }

    #[test]
    fn test_record_keeps_key_order() {
        let record = record_from_json(&json!({"zeta": 1, "alpha": 2, "mid": 3})).unwrap();
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_record_from_non_object_is_rejected() {
        assert!(record_from_json(&json!([1, 2])).is_err());
        assert!(record_from_json(&json!("record")).is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let date = parse_date("2024-02-29").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 2, 29));

        assert!(parse_date("2024-02-29T10:30:00Z").is_some());
        assert!(parse_date("2024-02-29T10:30:00+02:00").is_some());
        assert!(parse_date("2024-02-29 10:30:00").is_some());
        assert!(parse_date("02/29/2024").is_some());

        assert!(parse_date("").is_none());
        assert!(parse_date("not a date").is_none());
        assert!(parse_date("2023-02-30").is_none());
    }

    #[test]
    fn test_parse_year_and_year_month() {
        let year = parse_date("2024").unwrap();
        assert_eq!((year.year(), year.month(), year.day()), (2024, 1, 1));

        let month = parse_date("2024-06").unwrap();
        assert_eq!((month.year(), month.month(), month.day()), (2024, 6, 1));

        assert!(parse_date("2024-13").is_none());
        assert!(parse_date("2024-").is_none());
        assert!(parse_date("24").is_none());
        assert!(parse_date("2024-6a").is_none());
    }

    #[test]
    fn test_serde_round_trip_through_json() {
        let value: FieldValue = serde_json::from_str(r#"{"tags":["a","b"]}"#).unwrap();
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"tags":["a","b"]}"#);
    }
}
