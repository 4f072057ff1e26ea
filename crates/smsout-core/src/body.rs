//! Helpers for picking fields out of loosely shaped gateway responses.
//! A body that does not parse degrades to `Value::Null`; the
//! status-driven error still fires, only without diagnostic detail.

use serde_json::Value;

/// Parse a response body, degrading to `Null` when it is not valid JSON.
pub fn parse_loose(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or(Value::Null)
}

/// Integer that may arrive as a JSON number or a numeric string.
pub fn as_code(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Optional top-level `message` diagnostic.
pub fn error_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
