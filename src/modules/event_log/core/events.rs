use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const RECEIVED_AT: &str = "received_at";

/// One client-reported action. The schema is open; the only field the
/// server owns is `received_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEvent(Map<String, Value>);

impl LogEvent {
    /// Stamps `fields` with the receipt time, replacing any client value.
    pub fn received(mut fields: Map<String, Value>, received_at: &str) -> Self {
        fields.insert(RECEIVED_AT.to_string(), Value::String(received_at.to_string()));
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn received_at(&self) -> Option<&str> {
        self.0.get(RECEIVED_AT).and_then(Value::as_str)
    }

}

impl From<LogEvent> for Value {
    fn from(event: LogEvent) -> Self {
        Value::Object(event.0)
    }
}

impl From<Map<String, Value>> for LogEvent {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// RFC 3339, microsecond precision, `+00:00` offset.
pub fn format_received_at(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Keeps the object elements of `raw`, each stamped with the same receipt
/// time. Anything that is not a JSON object is dropped.
pub fn normalize_events(raw: Vec<Value>, received_at: DateTime<Utc>) -> Vec<LogEvent> {
    let stamp = format_received_at(received_at);
    raw.into_iter()
        .filter_map(|value| match value {
            Value::Object(fields) => Some(LogEvent::received(fields, &stamp)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod log_event_tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn received_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    #[rstest]
    fn it_should_format_the_receipt_time_as_utc_iso_8601(received_at: DateTime<Utc>) {
        assert_eq!(
            format_received_at(received_at),
            "2025-01-02T03:04:05.000000+00:00"
        );
    }

    #[rstest]
    fn it_should_stamp_every_object_with_the_same_time(received_at: DateTime<Utc>) {
        let events = normalize_events(vec![json!({"a": 1}), json!({"b": 2})], received_at);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].get("a"), Some(&json!(1)));
        assert_eq!(events[0].received_at(), events[1].received_at());
        let parsed = DateTime::parse_from_rfc3339(events[0].received_at().unwrap()).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), received_at);
    }

    #[rstest]
    fn it_should_overwrite_a_client_supplied_received_at(received_at: DateTime<Utc>) {
        let events = normalize_events(
            vec![json!({"a": 1, "received_at": "1999-12-31T23:59:59Z"})],
            received_at,
        );

        assert_eq!(
            events[0].received_at(),
            Some("2025-01-02T03:04:05.000000+00:00")
        );
    }

    #[rstest]
    fn it_should_drop_elements_that_are_not_objects(received_at: DateTime<Utc>) {
        let events = normalize_events(
            vec![json!(1), json!("x"), json!(null), json!([1]), json!({"kept": true})],
            received_at,
        );

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].get("kept"), Some(&json!(true)));
    }

    #[rstest]
    fn it_should_keep_the_client_field_order(received_at: DateTime<Utc>) {
        let events = normalize_events(vec![json!({"zeta": 1, "alpha": 2})], received_at);

        assert_eq!(
            serde_json::to_string(&events[0]).unwrap(),
            r#"{"zeta":1,"alpha":2,"received_at":"2025-01-02T03:04:05.000000+00:00"}"#
        );
    }
}
