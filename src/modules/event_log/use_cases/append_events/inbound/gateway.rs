// Gateway envelope surface.
//
// Accepts an API-Gateway-style invocation document (REST v1 or HTTP v2),
// unwraps the HTTP request it carries, and answers with the matching
// response envelope. Storage notifications and direct invocations are
// recognised as well.

use axum::{Json, body::Bytes, extract::State, http::Method};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::modules::event_log::core::payload::empty_payload;
use crate::modules::event_log::use_cases::append_events::command::IngestRequest;
use crate::modules::event_log::use_cases::append_events::handler::AppendEventsHandler;
use crate::modules::event_log::use_cases::append_events::response::IngestResponse;
use crate::shared::infrastructure::object_store::ObjectStore;
use crate::shell::state::AppState;

#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Preflight,
    Http {
        body: Option<String>,
        is_base64_encoded: bool,
    },
    /// An HTTP v2 request without a body, e.g. a GET.
    Bodiless,
    /// Not an HTTP request at all, e.g. a storage notification.
    NotApplicable,
    /// Invoked directly with the submission as the whole document.
    Direct { body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl From<IngestResponse> for GatewayResponse {
    fn from(response: IngestResponse) -> Self {
        let headers = response
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self {
            status_code: response.status.as_u16(),
            headers,
            body: response.body,
        }
    }
}

fn http_method(event: &Value) -> Option<&str> {
    event
        .get("httpMethod")
        .or_else(|| event.pointer("/requestContext/http/method"))
        .and_then(Value::as_str)
}

pub fn classify(event: &Value) -> Invocation {
    if http_method(event) == Some("OPTIONS") {
        return Invocation::Preflight;
    }
    if let Some(body) = event.get("body") {
        let is_base64_encoded = event
            .get("isBase64Encoded")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        return match body {
            Value::Null => Invocation::Http {
                body: None,
                is_base64_encoded,
            },
            Value::String(text) => Invocation::Http {
                body: Some(text.clone()),
                is_base64_encoded,
            },
            // Already-decoded JSON, only strings are ever base64.
            other => Invocation::Http {
                body: Some(other.to_string()),
                is_base64_encoded: false,
            },
        };
    }
    if event.pointer("/requestContext/http").is_some() {
        return Invocation::Bodiless;
    }
    if event.get("Records").is_some() {
        return Invocation::NotApplicable;
    }
    let body = match event {
        Value::Object(map) if !map.is_empty() => event.to_string(),
        _ => empty_payload().to_string(),
    };
    Invocation::Direct { body }
}

pub async fn invoke<TStore>(
    handler: &AppendEventsHandler<TStore>,
    event: &Value,
    received_at: DateTime<Utc>,
) -> IngestResponse
where
    TStore: ObjectStore + ?Sized + 'static,
{
    let (method, body, is_base64_encoded) = match classify(event) {
        Invocation::Preflight => (Method::OPTIONS, None, false),
        Invocation::Http {
            body,
            is_base64_encoded,
        } => (Method::POST, body, is_base64_encoded),
        Invocation::Direct { body } => (Method::POST, Some(body), false),
        Invocation::Bodiless => {
            debug!("Gateway request without body, nothing to append");
            return IngestResponse::no_content();
        }
        Invocation::NotApplicable => {
            debug!("Ignored non-HTTP invocation");
            return IngestResponse::not_applicable();
        }
    };

    handler
        .handle(IngestRequest {
            method,
            body,
            is_base64_encoded,
            received_at,
        })
        .await
}

/// `POST /invoke`: the request body is the invocation document. An unreadable
/// document counts as an empty direct invocation.
pub async fn handle(State(state): State<AppState>, body: Bytes) -> Json<GatewayResponse> {
    let event: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let response = invoke(&*state.append_handler, &event, Utc::now()).await;
    Json(response.into())
}
