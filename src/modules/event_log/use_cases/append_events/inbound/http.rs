use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderName, HeaderValue, Method},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::modules::event_log::use_cases::append_events::command::IngestRequest;
use crate::modules::event_log::use_cases::append_events::response::IngestResponse;
use crate::shell::state::AppState;

/// Plain HTTP surface: the request body is the submission, never base64.
pub async fn handle(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    let request = IngestRequest {
        method,
        body: String::from_utf8(body.to_vec()).ok(),
        is_base64_encoded: false,
        received_at: Utc::now(),
    };

    state.append_handler.handle(request).await.into_response()
}

impl IntoResponse for IngestResponse {
    fn into_response(self) -> Response {
        let extra: Vec<_> = self.headers().collect();
        let mut response = if self.body.is_empty() {
            self.status.into_response()
        } else {
            (self.status, self.body).into_response()
        };
        let headers = response.headers_mut();
        for (name, value) in extra {
            if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
                headers.insert(name, HeaderValue::from_static(value));
            }
        }
        response
    }
}

#[cfg(test)]
mod append_events_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::modules::event_log::core::routing::{DEFAULT_LOG_KEY, LogRouting};
    use crate::modules::event_log::use_cases::append_events::handler::AppendEventsHandler;
    use crate::shared::infrastructure::object_store::ObjectStore;
    use crate::shared::infrastructure::object_store::in_memory::InMemoryObjectStore;
    use crate::shell::state::AppState;
    use crate::tests::fixtures::documents::stored_document;

    use super::handle;

    fn make_test_state(store: Arc<InMemoryObjectStore>) -> AppState {
        let store: Arc<dyn ObjectStore> = store;
        AppState {
            append_handler: Arc::new(AppendEventsHandler::new(store, LogRouting::default())),
        }
    }

    fn make_offline_store() -> Arc<InMemoryObjectStore> {
        let mut store = InMemoryObjectStore::new();
        store.toggle_offline();
        Arc::new(store)
    }

    fn app(state: AppState) -> Router {
        Router::new().fallback(handle).with_state(state)
    }

    #[tokio::test]
    async fn it_should_return_204_with_cors_headers_on_valid_request() {
        let store = Arc::new(InMemoryObjectStore::new());

        let response = app(make_test_state(store.clone()))
            .oneshot(
                Request::post("/logs")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"events":[{"action":"click"}]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["access-control-allow-methods"], "OPTIONS,POST");
        assert_eq!(response.headers()["access-control-allow-headers"], "Content-Type");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
        assert_eq!(stored_document(&store, DEFAULT_LOG_KEY).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn it_should_answer_preflight_without_touching_the_store() {
        let store = Arc::new(InMemoryObjectStore::new());

        let response = app(make_test_state(store.clone()))
            .oneshot(
                Request::options("/any/path")
                    .header("origin", "https://app.example")
                    .header("access-control-request-method", "POST")
                    .body(Body::from(r#"{"events":[{"a":1}]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()["access-control-allow-methods"],
            "OPTIONS,POST"
        );
        assert_eq!(store.read_count(), 0);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn it_should_return_204_on_invalid_json() {
        let store = Arc::new(InMemoryObjectStore::new());

        let response = app(make_test_state(store.clone()))
            .oneshot(
                Request::post("/logs")
                    .header("content-type", "application/json")
                    .body(Body::from("not-json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn it_should_return_204_on_a_body_that_is_not_utf8() {
        let response = app(make_test_state(Arc::new(InMemoryObjectStore::new())))
            .oneshot(
                Request::post("/logs")
                    .body(Body::from(vec![0xff, 0xfe, 0xfd]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn it_should_return_500_when_the_store_is_offline() {
        let response = app(make_test_state(make_offline_store()))
            .oneshot(
                Request::post("/logs")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"[{"a":1}]"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["content-type"], "application/json");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["message"], "Failed to append logs");
        assert!(json.get("error").is_some());
    }
}
