// Shared test fixtures for stored log documents.

use crate::modules::event_log::adapters::outbound::log_document::DOCUMENT_CONTENT_TYPE;
use crate::modules::event_log::core::document::LogDocument;
use crate::modules::event_log::core::events::LogEvent;
use crate::shared::infrastructure::object_store::in_memory::InMemoryObjectStore;
use serde_json::json;

pub const FIXED_RECEIVED_AT: &str = "2024-06-01T00:00:00.000000+00:00";

/// An already-stored event, identified by `seq`.
pub fn make_event(seq: usize) -> LogEvent {
    let fields = json!({"seq": seq, "action": "click"});
    LogEvent::received(
        fields.as_object().cloned().unwrap_or_default(),
        FIXED_RECEIVED_AT,
    )
}

/// `len` events with `seq` 0 to `len - 1`, oldest first.
pub fn make_document(len: usize) -> LogDocument {
    LogDocument::from_events((0..len).map(make_event).collect())
}

pub async fn seed_document(store: &InMemoryObjectStore, key: &str, len: usize) {
    let bytes = serde_json::to_vec(&make_document(len)).unwrap();
    store.insert(key, bytes, DOCUMENT_CONTENT_TYPE).await;
}

pub async fn stored_document(store: &InMemoryObjectStore, key: &str) -> Option<LogDocument> {
    let object = store.object(key).await?;
    Some(serde_json::from_slice(&object.bytes).unwrap())
}
