//! Normalisation of JSON-valued columns.
//!
//! Rows written by different producers hold these columns either as a JSON
//! array or as a JSON document encoded into a string. Both shapes decode to
//! the same list here, once, at the read boundary.

use serde_json::Value;
use tracing::warn;

/// Decodes a column into its list elements. NULL is an empty list; malformed
/// content is logged and treated as empty.
pub fn decode_value_list(column: &str, value: Option<Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(items)) => items,
            Ok(Value::Null) => Vec::new(),
            Ok(other) => {
                warn!("Column {column} holds encoded {} instead of an array", kind(&other));
                Vec::new()
            }
            Err(_) if text.trim().is_empty() => Vec::new(),
            Err(e) => {
                warn!("Column {column} holds undecodable text: {e}");
                Vec::new()
            }
        },
        Some(other) => {
            warn!("Column {column} holds {} instead of an array", kind(&other));
            Vec::new()
        }
    }
}

/// Decodes a column of skill names. Object elements contribute their
/// `name` (or `skill`) field; anything else is skipped.
pub fn decode_string_list(column: &str, value: Option<Value>) -> Vec<String> {
    decode_value_list(column, value)
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Object(map) => map
                .get("name")
                .or_else(|| map.get("skill"))
                .and_then(Value::as_str)
                .map(String::from),
            _ => None,
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
