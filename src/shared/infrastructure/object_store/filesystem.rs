//! Filesystem-backed object store.
//!
//! Keys are relative paths under a root directory:
//! ```text
//! {root}/
//!   logs/
//!     latest.json
//! ```

use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::debug;

use crate::shared::infrastructure::object_store::{ObjectStore, ObjectStoreError};

pub struct FilesystemObjectStore {
    root: PathBuf,
}

impl FilesystemObjectStore {
    /// Creates the root directory if it doesn't exist.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, ObjectStoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            ObjectStoreError::Backend(format!("create {}: {e}", root.display()))
        })?;
        Ok(Self { root })
    }

    /// Only plain relative components are accepted, so a key can never
    /// escape the root.
    fn path_for_key(&self, key: &str) -> Result<PathBuf, ObjectStoreError> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && !key.contains('\\')
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !is_plain {
            return Err(ObjectStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ObjectStoreError> {
        let path = self.path_for_key(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ObjectStoreError::Backend(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        let path = self.path_for_key(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                ObjectStoreError::Backend(format!("create {}: {e}", parent.display()))
            })?;
        }

        // Unique temp file per write in the target directory, renamed over the target.
        let target = path.clone();
        let size = bytes.len();
        tokio::task::spawn_blocking(move || write_replacing(&target, &bytes))
            .await
            .map_err(|e| ObjectStoreError::Backend(format!("write task failed: {e}")))??;

        debug!(
            key = %key,
            size,
            content_type = %content_type,
            "Stored object on filesystem"
        );
        Ok(())
    }
}

fn write_replacing(path: &Path, bytes: &[u8]) -> Result<(), ObjectStoreError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| {
        ObjectStoreError::Backend(format!("create temp in {}: {e}", dir.display()))
    })?;
    if let Err(e) = temp.write_all(bytes).and_then(|()| temp.as_file().sync_all()) {
        return Err(ObjectStoreError::Backend(format!(
            "write {}: {e}",
            temp.path().display()
        )));
    }
    temp.persist(path).map_err(|e| {
        ObjectStoreError::Backend(format!("rename {}: {}", path.display(), e.error))
    })?;
    Ok(())
}
