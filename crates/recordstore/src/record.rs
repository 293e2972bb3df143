// Copyright 2025 Alexandre D. Díaz
use chrono::{DateTime, Utc};

use crate::error::{DataError, Result};
use crate::value::{FieldMap, Value};

/// A row-backed entity the [`crate::RecordMapper`] can persist.
///
/// `id() == 0` means "not stored yet". The mapper is the only caller of
/// `set_id`, right after the first successful insert.
///
/// `to_field_map` keys must match column names: a column with no entry is
/// written as NULL without any warning.
pub trait Record: Sized {
    const TABLE: &'static str;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    fn to_field_map(&self) -> FieldMap;

    fn from_field_map(fields: &FieldMap) -> Result<Self>;
}

fn field<'a>(fields: &'a FieldMap, name: &str) -> Result<&'a Value> {
    fields
        .get(name)
        .ok_or_else(|| DataError::Mapping(format!("missing column '{}'", name)))
}

fn mismatch(name: &str, expected: &str, value: &Value) -> DataError {
    DataError::Mapping(format!("column '{}' is not {}: {:?}", name, expected, value))
}

pub fn get_i64(fields: &FieldMap, name: &str) -> Result<i64> {
    let value = field(fields, name)?;
    value.as_i64().ok_or_else(|| mismatch(name, "an integer", value))
}

pub fn get_string(fields: &FieldMap, name: &str) -> Result<String> {
    let value = field(fields, name)?;
    value.to_text().ok_or_else(|| mismatch(name, "text", value))
}

pub fn get_bool(fields: &FieldMap, name: &str) -> Result<bool> {
    let value = field(fields, name)?;
    value.as_bool().ok_or_else(|| mismatch(name, "a boolean", value))
}

/// Missing and NULL both read as `None`.
pub fn get_opt_string(fields: &FieldMap, name: &str) -> Result<Option<String>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .to_text()
            .map(Some)
            .ok_or_else(|| mismatch(name, "text", value)),
    }
}

pub fn get_opt_timestamp(fields: &FieldMap, name: &str) -> Result<Option<DateTime<Utc>>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_timestamp()
            .map(Some)
            .ok_or_else(|| mismatch(name, "a datetime", value)),
    }
}

/// Decodes a JSON column (or a sniffed JSON-looking text) into `T`.
pub fn get_json<T: serde::de::DeserializeOwned + Default>(fields: &FieldMap, name: &str) -> Result<T> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(Value::Json(json)) => serde_json::from_value(json.clone())
            .map_err(|err| DataError::Mapping(format!("column '{}': {}", name, err))),
        Some(Value::Text(text)) => serde_json::from_str(text)
            .map_err(|err| DataError::Mapping(format!("column '{}': {}", name, err))),
        Some(value) => Err(mismatch(name, "JSON", value)),
    }
}
