// Shared test fixture for the IngestRequest handed to the handler.

use crate::modules::event_log::use_cases::append_events::command::IngestRequest;
use axum::http::Method;
use chrono::{DateTime, TimeZone, Utc};

pub fn fixed_received_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap()
}

pub struct IngestRequestBuilder {
    inner: IngestRequest,
}

impl Default for IngestRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl IngestRequestBuilder {
    pub fn new() -> Self {
        Self {
            inner: IngestRequest {
                method: Method::POST,
                body: Some(r#"{"events":[{"action":"click","user":"user-fixed-0001"}]}"#.into()),
                is_base64_encoded: false,
                received_at: fixed_received_at(),
            },
        }
    }

    pub fn method(mut self, v: Method) -> Self {
        self.inner.method = v;
        self
    }

    pub fn body(mut self, v: impl Into<String>) -> Self {
        self.inner.body = Some(v.into());
        self
    }

    pub fn without_body(mut self) -> Self {
        self.inner.body = None;
        self
    }

    pub fn base64_encoded(mut self, v: bool) -> Self {
        self.inner.is_base64_encoded = v;
        self
    }

    pub fn received_at(mut self, v: DateTime<Utc>) -> Self {
        self.inner.received_at = v;
        self
    }

    pub fn build(self) -> IngestRequest {
        self.inner
    }
}

#[cfg(test)]
mod ingest_request_builder_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_delegates_to_new() {
        let built = IngestRequestBuilder::default().build();

        assert_eq!(built.method, Method::POST);
        assert!(built.body.unwrap().contains("user-fixed-0001"));
        assert!(!built.is_base64_encoded);
        assert_eq!(built.received_at, fixed_received_at());
    }

    #[rstest]
    fn setters_override_all_fields_and_build_returns_inner() {
        let at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let custom = IngestRequestBuilder::new()
            .method(Method::OPTIONS)
            .body("e30=")
            .base64_encoded(true)
            .received_at(at)
            .build();

        assert!(custom.is_preflight());
        assert_eq!(custom.body.as_deref(), Some("e30="));
        assert!(custom.is_base64_encoded);
        assert_eq!(custom.received_at, at);
        assert_eq!(IngestRequestBuilder::new().without_body().build().body, None);
    }
}
