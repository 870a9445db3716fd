use crate::modules::event_log::core::payload::EVENTS_FIELD;
use serde_json::Value;

pub const USER_FIELD: &str = "user";
pub const ANONYMOUS: &str = "anonymous";

const FORBIDDEN: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// The submitter named by the payload, looked up on the first element of
/// `events`, the first element of a bare array, or the payload object itself.
pub fn extract_identity(payload: &Value) -> Option<&str> {
    let candidate = match payload {
        Value::Object(map) => match map.get(EVENTS_FIELD) {
            Some(Value::Array(events)) => events.first(),
            _ => Some(payload),
        },
        Value::Array(events) => events.first(),
        _ => None,
    };
    candidate
        .and_then(|event| event.get(USER_FIELD))
        .and_then(Value::as_str)
}

pub fn resolve_identity(payload: &Value) -> String {
    sanitize_identity(extract_identity(payload).unwrap_or_default())
}

/// Makes `raw` safe to use as a single storage key component.
pub fn sanitize_identity(raw: &str) -> String {
    let mut sanitized = String::with_capacity(raw.len());
    for ch in raw.chars() {
        let ch = if ch.is_whitespace() || FORBIDDEN.contains(&ch) {
            '_'
        } else {
            ch
        };
        if ch == '_' && sanitized.ends_with('_') {
            continue;
        }
        sanitized.push(ch);
    }
    match sanitized.trim_matches('_') {
        "" => ANONYMOUS.to_string(),
        trimmed => trimmed.to_string(),
    }
}
