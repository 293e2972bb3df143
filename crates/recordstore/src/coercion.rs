// Copyright 2025 Alexandre D. Díaz
//! Conversion between SQLite cells and [`Value`].
//!
//! Writes go through [`TypeCoercion::format_for_write`]; reads go through
//! [`TypeCoercion::parse_from_read`] and are driven by the declared type of
//! the result column, classified once into a [`ColumnKind`].
use rusqlite::types::Value as SqlValue;

use crate::utils::date::{from_sqlite_datetime, from_unix_seconds, to_sqlite_datetime};
use crate::value::Value;

/// Classification of a declared column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Temporal,
    Json,
    Boolean,
    Scalar,
}

impl ColumnKind {
    pub fn from_declared(decl_type: Option<&str>) -> ColumnKind {
        let decl = match decl_type {
            Some(decl) => decl.to_ascii_uppercase(),
            None => return ColumnKind::Scalar,
        };
        if decl.contains("DATE") || decl.contains("TIME") {
            ColumnKind::Temporal
        } else if decl.contains("JSON") {
            ColumnKind::Json
        } else if decl.contains("BOOL") {
            ColumnKind::Boolean
        } else {
            ColumnKind::Scalar
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TypeCoercion {
    /// Parse `[...]` text read from non-JSON columns. See [`sniff_json_array`].
    pub sniff_json_arrays: bool,
}

impl Default for TypeCoercion {
    fn default() -> Self {
        TypeCoercion { sniff_json_arrays: true }
    }
}

impl TypeCoercion {
    pub fn new(sniff_json_arrays: bool) -> TypeCoercion {
        TypeCoercion { sniff_json_arrays }
    }

    pub fn format_for_write(&self, value: &Value) -> SqlValue {
        match value {
            Value::Null => SqlValue::Null,
            Value::Integer(v) => SqlValue::Integer(*v),
            Value::Real(v) => SqlValue::Real(*v),
            Value::Text(v) => SqlValue::Text(v.clone()),
            Value::Bool(v) => SqlValue::Integer(*v as i64),
            Value::Timestamp(v) => SqlValue::Text(to_sqlite_datetime(*v)),
            Value::Json(v) => json_for_write(v),
            Value::Blob(v) => SqlValue::Blob(v.clone()),
        }
    }

    pub fn parse_from_read(&self, raw: SqlValue, kind: ColumnKind) -> Value {
        match (raw, kind) {
            (SqlValue::Null, _) => Value::Null,
            (SqlValue::Text(text), ColumnKind::Temporal) => match from_sqlite_datetime(&text) {
                Some(dt) => Value::Timestamp(dt),
                None => {
                    log::warn!("'{}' is not a valid datetime, keeping it as text", &text);
                    Value::Text(text)
                }
            },
            (SqlValue::Integer(secs), ColumnKind::Temporal) => {
                from_unix_seconds(secs).map_or(Value::Integer(secs), Value::Timestamp)
            }
            (SqlValue::Text(text), ColumnKind::Json) => match serde_json::from_str(&text) {
                Ok(json) => Value::Json(json),
                Err(err) => {
                    log::warn!("malformed JSON cell ({}), keeping it as text", err);
                    Value::Text(text)
                }
            },
            (SqlValue::Integer(v), ColumnKind::Boolean) => Value::Bool(v != 0),
            (SqlValue::Text(text), _) if self.sniff_json_arrays => match sniff_json_array(&text) {
                Some(json) => Value::Json(json),
                None => Value::Text(text),
            },
            (raw, _) => passthrough(raw),
        }
    }
}

/// Opportunistic parse of text that looks like a JSON array (`[` ... `]`).
///
/// Applied to columns not declared as JSON, for tables that keep lists in
/// plain text columns. It can misfire: a literal string such as `"[1]"`
/// comes back as an array. Text that does not parse is returned as `None`.
pub fn sniff_json_array(text: &str) -> Option<serde_json::Value> {
    if !(text.starts_with('[') && text.ends_with(']')) {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(json) if json.is_array() => Some(json),
        _ => None,
    }
}

fn json_for_write(json: &serde_json::Value) -> SqlValue {
    match json {
        serde_json::Value::Null => SqlValue::Null,
        serde_json::Value::Bool(v) => SqlValue::Integer(*v as i64),
        serde_json::Value::Number(num) => match num.as_i64() {
            Some(v) => SqlValue::Integer(v),
            None => SqlValue::Real(num.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(v) => SqlValue::Text(v.clone()),
        composite => SqlValue::Text(composite.to_string()),
    }
}

fn passthrough(raw: SqlValue) -> Value {
    match raw {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(v) => Value::Integer(v),
        SqlValue::Real(v) => Value::Real(v),
        SqlValue::Text(v) => Value::Text(v),
        SqlValue::Blob(v) => Value::Blob(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn roundtrip(value: Value, kind: ColumnKind) -> Value {
        let coercion = TypeCoercion::default();
        coercion.parse_from_read(coercion.format_for_write(&value), kind)
    }

    #[test]
    fn classifies_declared_types() {
        assert_eq!(ColumnKind::from_declared(Some("DATETIME")), ColumnKind::Temporal);
        assert_eq!(ColumnKind::from_declared(Some("timestamp")), ColumnKind::Temporal);
        assert_eq!(ColumnKind::from_declared(Some("date")), ColumnKind::Temporal);
        assert_eq!(ColumnKind::from_declared(Some("JSON")), ColumnKind::Json);
        assert_eq!(ColumnKind::from_declared(Some("boolean")), ColumnKind::Boolean);
        assert_eq!(ColumnKind::from_declared(Some("varchar(64)")), ColumnKind::Scalar);
        assert_eq!(ColumnKind::from_declared(None), ColumnKind::Scalar);
    }

    #[test]
    fn timestamps_are_written_as_sqlite_datetime() {
        let coercion = TypeCoercion::default();
        let dt = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 58).unwrap();
        assert_eq!(
            coercion.format_for_write(&Value::Timestamp(dt)),
            SqlValue::Text("2023-12-31 23:59:58".to_string())
        );
    }

    #[test]
    fn composites_are_written_as_json_text() {
        let coercion = TypeCoercion::default();
        assert_eq!(
            coercion.format_for_write(&Value::Json(json!(["a", "b"]))),
            SqlValue::Text(r#"["a","b"]"#.to_string())
        );
        assert_eq!(
            coercion.format_for_write(&Value::Json(json!({"k": 1}))),
            SqlValue::Text(r#"{"k":1}"#.to_string())
        );
        assert_eq!(coercion.format_for_write(&Value::Json(json!(7))), SqlValue::Integer(7));
    }

    #[test]
    fn values_survive_a_roundtrip() {
        let dt = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 0).unwrap();
        assert_eq!(roundtrip(Value::Timestamp(dt), ColumnKind::Temporal), Value::Timestamp(dt));
        let list = json!(["x", 1, null]);
        assert_eq!(roundtrip(Value::Json(list.clone()), ColumnKind::Json), Value::Json(list));
        let obj = json!({"nested": {"ok": true}});
        assert_eq!(roundtrip(Value::Json(obj.clone()), ColumnKind::Json), Value::Json(obj));
        assert_eq!(roundtrip(Value::Integer(-4), ColumnKind::Scalar), Value::Integer(-4));
        assert_eq!(roundtrip(Value::Real(1.5), ColumnKind::Scalar), Value::Real(1.5));
        assert_eq!(roundtrip("plain".into(), ColumnKind::Scalar), Value::Text("plain".into()));
        assert_eq!(roundtrip(Value::Bool(true), ColumnKind::Boolean), Value::Bool(true));
        assert_eq!(roundtrip(Value::Bool(false), ColumnKind::Boolean), Value::Bool(false));
        assert_eq!(roundtrip(Value::Null, ColumnKind::Json), Value::Null);
    }

    #[test]
    fn malformed_json_degrades_to_text() {
        let coercion = TypeCoercion::default();
        let raw = SqlValue::Text("{not json".to_string());
        assert_eq!(
            coercion.parse_from_read(raw, ColumnKind::Json),
            Value::Text("{not json".to_string())
        );
    }

    #[test]
    fn bad_datetime_degrades_to_text() {
        let coercion = TypeCoercion::default();
        let raw = SqlValue::Text("soon".to_string());
        assert_eq!(coercion.parse_from_read(raw, ColumnKind::Temporal), Value::Text("soon".into()));
    }

    #[test]
    fn array_looking_text_is_sniffed() {
        let coercion = TypeCoercion::default();
        let raw = SqlValue::Text(r#"["red","blue"]"#.to_string());
        assert_eq!(
            coercion.parse_from_read(raw, ColumnKind::Scalar),
            Value::Json(json!(["red", "blue"]))
        );
        // Brackets alone are not enough: this one fails to parse and stays text.
        let raw = SqlValue::Text("[abc]".to_string());
        assert_eq!(coercion.parse_from_read(raw, ColumnKind::Scalar), Value::Text("[abc]".into()));
    }

    #[test]
    fn sniffing_can_be_disabled() {
        let coercion = TypeCoercion::new(false);
        let raw = SqlValue::Text("[1,2]".to_string());
        assert_eq!(coercion.parse_from_read(raw, ColumnKind::Scalar), Value::Text("[1,2]".into()));
    }

    #[test]
    fn sniff_only_accepts_arrays() {
        assert_eq!(sniff_json_array("[1, 2]"), Some(json!([1, 2])));
        assert_eq!(sniff_json_array("{\"a\":1}"), None);
        assert_eq!(sniff_json_array("[unterminated"), None);
        assert_eq!(sniff_json_array("[abc]"), None);
    }
}
