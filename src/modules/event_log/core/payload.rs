// Defensive decoding of a client submission.
//
// Nothing in here fails: undecodable base64, invalid UTF-8 and invalid JSON
// all degrade to an empty payload object, which extracts to no events.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};
use std::borrow::Cow;

pub const EVENTS_FIELD: &str = "events";

pub fn empty_payload() -> Value {
    Value::Object(Map::new())
}

pub fn parse_payload(body: Option<&str>, is_base64_encoded: bool) -> Value {
    let Some(raw) = body else {
        return empty_payload();
    };
    let text: Cow<'_, str> = if is_base64_encoded {
        match decode_base64(raw) {
            Some(decoded) => Cow::Owned(decoded),
            None => return empty_payload(),
        }
    } else {
        Cow::Borrowed(raw)
    };
    serde_json::from_str(&text).unwrap_or_else(|_| empty_payload())
}

fn decode_base64(raw: &str) -> Option<String> {
    let bytes = STANDARD.decode(raw.trim()).ok()?;
    String::from_utf8(bytes).ok()
}

/// First matching shape wins: `{"events": [...]}`, a bare array, then a
/// non-empty object taken as a single event.
pub fn extract_events(payload: &Value) -> Vec<Value> {
    match payload {
        Value::Object(map) => match map.get(EVENTS_FIELD) {
            Some(Value::Array(events)) => events.clone(),
            _ if !map.is_empty() => vec![payload.clone()],
            _ => Vec::new(),
        },
        Value::Array(events) => events.clone(),
        _ => Vec::new(),
    }
}
