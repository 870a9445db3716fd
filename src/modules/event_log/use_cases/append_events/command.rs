use axum::http::Method;
use chrono::{DateTime, Utc};

/// One inbound request as handed over by the gateway. `received_at` is taken
/// once per request and shared by every event it carries.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestRequest {
    pub method: Method,
    pub body: Option<String>,
    pub is_base64_encoded: bool,
    pub received_at: DateTime<Utc>,
}

impl IngestRequest {
    pub fn is_preflight(&self) -> bool {
        self.method == Method::OPTIONS
    }
}
