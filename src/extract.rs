//! Lenient scalar extraction from parsed trees.
//!
//! Schema fragments in the wild are often partial or sloppy, so nothing here
//! fails: a missing key or a value of the wrong kind yields the zero value.

use serde_json::Value;

/// Read `key` as a string.
///
/// Strings are returned verbatim, numbers are formatted in decimal, and lists
/// are flattened by concatenating their string elements (other elements are
/// skipped). Everything else, including absence, is the empty string.
pub fn string(node: &Value, key: &str) -> String {
    match node.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => String::new(),
    }
}

/// Read `key` as a boolean. Only `true` and `"true"` count as true.
pub fn boolean(node: &Value, key: &str) -> bool {
    match node.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        _ => false,
    }
}

/// Read `key` shaped after a declared schema type.
///
/// `"string"` and `"boolean"` go through [`string`] and [`boolean`]. Any
/// other type returns the raw value untouched, or the empty string when the
/// key is absent.
pub fn value(node: &Value, key: &str, declared_type: &str) -> Value {
    match declared_type {
        "string" => Value::String(string(node, key)),
        "boolean" => Value::Bool(boolean(node, key)),
        _ => match node.get(key) {
            Some(raw) => raw.clone(),
            None => Value::String(string(node, key)),
        },
    }
}
