use axum::http::StatusCode;
use serde_json::json;
use std::fmt::Display;

pub const FAILURE_MESSAGE: &str = "Failed to append logs";
pub const NOT_A_WEB_REQUEST: &str = "Not a web request";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Sent with every response, preflight or not.
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "OPTIONS,POST"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestResponse {
    pub status: StatusCode,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl IngestResponse {
    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            content_type: None,
            body: String::new(),
        }
    }

    pub fn not_applicable() -> Self {
        Self {
            status: StatusCode::OK,
            content_type: None,
            body: NOT_A_WEB_REQUEST.to_string(),
        }
    }

    pub fn failure(error: &dyn Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            content_type: Some(JSON_CONTENT_TYPE),
            body: json!({
                "message": FAILURE_MESSAGE,
                "error": error.to_string(),
            })
            .to_string(),
        }
    }

    pub fn headers(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        CORS_HEADERS
            .into_iter()
            .chain(self.content_type.map(|value| ("Content-Type", value)))
    }
}
