// In memory implementation of the ObjectStore port.
//
// Purpose
// - Support handler tests and local development without a bucket.
//
// Responsibilities
// - Keep objects per key in memory.
// - Simulate outages: offline fails every call, read only fails writes.
// - Count calls so tests can assert which side effects happened.

use crate::shared::infrastructure::object_store::{ObjectStore, ObjectStoreError, StoredObject};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: RwLock<HashMap<String, StoredObject>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    is_offline: bool,
    is_read_only: bool,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub fn toggle_read_only(&mut self) {
        self.is_read_only = !self.is_read_only;
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Seeds an object without counting it as a write.
    pub async fn insert(&self, key: &str, bytes: Vec<u8>, content_type: &str) {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
    }

    pub async fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }
}

#[async_trait::async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ObjectStoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.is_offline {
            return Err(ObjectStoreError::Backend("Object store offline".into()));
        }
        Ok(self
            .objects
            .read()
            .await
            .get(key)
            .map(|object| object.bytes.clone()))
    }

    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.is_offline {
            return Err(ObjectStoreError::Backend("Object store offline".into()));
        }
        if self.is_read_only {
            return Err(ObjectStoreError::Backend("Object store is read only".into()));
        }
        self.insert(key, bytes, content_type).await;
        Ok(())
    }
}
