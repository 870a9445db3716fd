use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Blob storage addressed by key. Writes replace the whole object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// `Ok(None)` when nothing is stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ObjectStoreError>;
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStoreError>;
}

pub mod filesystem;
pub mod in_memory;
#[cfg(feature = "s3")]
pub mod s3;
