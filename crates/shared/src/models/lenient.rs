//! Tolerant field decoders for the upstream node API.
//!
//! The public API is loosely typed: numbers sometimes arrive as strings, timestamps
//! are ISO strings or epoch numbers, and any field can be `null`. A field that cannot
//! be interpreted decodes to `None` instead of failing the whole node list.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Strings, with numbers and booleans rendered as text. Anything else is empty.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string(deserializer)?.unwrap_or_default())
}

pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_string))
}

/// A nested object, or `None` when the field is not an object or does not fit `T`.
pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .filter(Value::is_object)
        .and_then(|object| serde_json::from_value(object).ok()))
}

pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}

/// Seconds since the epoch. Zero and negative values mean "never reported".
pub fn epoch_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(value_as_f64)
        .map(|secs| secs.trunc() as i64)
        .filter(|secs| *secs > 0))
}

pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_timestamp))
}

pub fn value_as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// RFC 3339 strings, or epoch milliseconds when the API sends a bare number.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) if !s.trim().is_empty() => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n
            .as_i64()
            .filter(|ms| *ms > 0)
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_as_f64_accepts_numeric_strings() {
        assert_eq!(value_as_f64(&json!(42.5)), Some(42.5));
        assert_eq!(value_as_f64(&json!(" 17 ")), Some(17.0));
        assert_eq!(value_as_f64(&json!("n/a")), None);
        assert_eq!(value_as_f64(&json!(null)), None);
        assert_eq!(value_as_f64(&json!(true)), None);
    }

    #[test]
    fn test_value_as_string_renders_scalars() {
        assert_eq!(value_as_string(&json!("lite")).as_deref(), Some("lite"));
        assert_eq!(value_as_string(&json!(2)).as_deref(), Some("2"));
        assert_eq!(value_as_string(&json!(false)).as_deref(), Some("false"));
        assert_eq!(value_as_string(&json!({ "a": 1 })), None);
        assert_eq!(value_as_string(&json!([1])), None);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let iso = parse_timestamp(&json!("2025-01-02T03:04:05.000Z")).unwrap();
        assert_eq!(iso.timestamp(), 1_735_787_045);

        let millis = parse_timestamp(&json!(1_735_787_045_000_i64)).unwrap();
        assert_eq!(millis, iso);

        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_timestamp(&json!("")), None);
        assert_eq!(parse_timestamp(&json!(0)), None);
    }
}
