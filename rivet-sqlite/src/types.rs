//! Conversions between filter values and SQLite values.

use rusqlite::types::{Value, ValueRef};
use serde_json::Value as JsonValue;

use rivet_query::filter::FilterValue;

/// Convert a bound argument to a SQLite value.
///
/// Booleans become 0/1, JSON and lists are stored as JSON text.
pub fn filter_value_to_sqlite(value: &FilterValue) -> Value {
    match value {
        FilterValue::Null => Value::Null,
        FilterValue::Bool(b) => Value::Integer(i64::from(*b)),
        FilterValue::Int(i) => Value::Integer(*i),
        FilterValue::Float(f) => Value::Real(*f),
        FilterValue::String(s) => Value::Text(s.clone()),
        FilterValue::Json(j) => Value::Text(j.to_string()),
        FilterValue::List(list) => {
            let array: Vec<JsonValue> = list.iter().map(to_json).collect();
            Value::Text(JsonValue::Array(array).to_string())
        }
    }
}

fn to_json(value: &FilterValue) -> JsonValue {
    match value {
        FilterValue::Null => JsonValue::Null,
        FilterValue::Bool(b) => JsonValue::Bool(*b),
        FilterValue::Int(i) => JsonValue::Number((*i).into()),
        FilterValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        FilterValue::String(s) => JsonValue::String(s.clone()),
        FilterValue::Json(j) => j.clone(),
        FilterValue::List(list) => JsonValue::Array(list.iter().map(to_json).collect()),
    }
}

/// Convert a column value read from SQLite.
///
/// Text is returned as-is; blobs that are valid UTF-8 become strings, others
/// a list of byte values.
pub fn from_sqlite_value(value: ValueRef<'_>) -> FilterValue {
    match value {
        ValueRef::Null => FilterValue::Null,
        ValueRef::Integer(i) => FilterValue::Int(i),
        ValueRef::Real(f) => FilterValue::Float(f),
        ValueRef::Text(bytes) => FilterValue::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => FilterValue::String(s.to_string()),
            Err(_) => FilterValue::List(bytes.iter().map(|b| FilterValue::Int(i64::from(*b))).collect()),
        },
    }
}
