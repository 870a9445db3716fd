use crate::modules::event_log::core::document::LogDocument;
use crate::shared::infrastructure::object_store::{ObjectStore, ObjectStoreError};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub const DOCUMENT_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum LogDocumentError {
    #[error(transparent)]
    Store(#[from] ObjectStoreError),

    #[error("stored document is not valid JSON: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Reads the document stored under `key`. A missing object, an empty object,
/// or JSON that is not an array all read as an empty document. Array entries
/// are kept as stored, objects or not.
pub async fn load_document<S>(store: &S, key: &str) -> Result<LogDocument, LogDocumentError>
where
    S: ObjectStore + ?Sized,
{
    let Some(bytes) = store.get(key).await? else {
        return Ok(LogDocument::new());
    };
    decode_document(key, &bytes)
}

/// Replaces the object under `key` with the full document. Non-ASCII text is
/// written as-is.
pub async fn save_document<S>(
    store: &S,
    key: &str,
    document: &LogDocument,
) -> Result<(), LogDocumentError>
where
    S: ObjectStore + ?Sized,
{
    let bytes = serde_json::to_vec(document).map_err(LogDocumentError::Encode)?;
    store.put(key, bytes, DOCUMENT_CONTENT_TYPE).await?;
    Ok(())
}

fn decode_document(key: &str, bytes: &[u8]) -> Result<LogDocument, LogDocumentError> {
    if bytes.is_empty() {
        return Ok(LogDocument::new());
    }
    let Value::Array(values) =
        serde_json::from_slice::<Value>(bytes).map_err(LogDocumentError::Corrupt)?
    else {
        warn!(key = %key, "Stored document is not an array, starting a new one");
        return Ok(LogDocument::new());
    };
    Ok(LogDocument::from_entries(values))
}
