use crate::modules::event_log::use_cases::append_events::handler::AppendEventsHandler;
use crate::shared::infrastructure::object_store::ObjectStore;
use crate::shared::infrastructure::object_store::filesystem::FilesystemObjectStore;
use crate::shared::infrastructure::object_store::in_memory::InMemoryObjectStore;
use crate::shell::config::{AppConfig, StoreConfig};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub append_handler: Arc<AppendEventsHandler<dyn ObjectStore>>,
}

impl AppState {
    /// Builds the store client once; every request shares it.
    pub async fn build(config: &AppConfig) -> anyhow::Result<Self> {
        let store = build_store(&config.store).await?;
        let handler = AppendEventsHandler::new(store, config.routing.clone())
            .with_max_events(config.max_events);
        info!(routing = ?config.routing, max_events = config.max_events, "Append handler ready");
        Ok(Self {
            append_handler: Arc::new(handler),
        })
    }
}

async fn build_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn ObjectStore>> {
    match config {
        StoreConfig::Memory => {
            info!("Using in-memory object store, documents are lost on restart");
            Ok(Arc::new(InMemoryObjectStore::new()))
        }
        StoreConfig::Filesystem { root } => {
            info!(root = %root.display(), "Using filesystem object store");
            Ok(Arc::new(FilesystemObjectStore::new(root).await?))
        }
        #[cfg(feature = "s3")]
        StoreConfig::S3 {
            bucket,
            endpoint,
            region,
        } => {
            use crate::shared::infrastructure::object_store::s3::S3ObjectStore;

            info!(bucket = %bucket, "Using S3 object store");
            let store = match endpoint {
                Some(endpoint) => {
                    S3ObjectStore::with_endpoint(bucket.clone(), endpoint, region.as_deref()).await
                }
                None => S3ObjectStore::new(bucket.clone()).await,
            };
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "s3"))]
        StoreConfig::S3 { .. } => {
            anyhow::bail!("EVENT_LOG_STORE=s3 requires building with the `s3` feature")
        }
    }
}
