use crate::modules::event_log::adapters::outbound::log_document::{
    LogDocumentError, load_document, save_document,
};
use crate::modules::event_log::core::document::DEFAULT_MAX_EVENTS;
use crate::modules::event_log::core::events::normalize_events;
use crate::modules::event_log::core::payload::{extract_events, parse_payload};
use crate::modules::event_log::core::routing::LogRouting;
use crate::modules::event_log::use_cases::append_events::command::IngestRequest;
use crate::modules::event_log::use_cases::append_events::response::IngestResponse;
use crate::shared::infrastructure::object_store::ObjectStore;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("failed to load {key}: {source}")]
    Load {
        key: String,
        #[source]
        source: LogDocumentError,
    },

    #[error("failed to save {key}: {source}")]
    Save {
        key: String,
        #[source]
        source: LogDocumentError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    pub key: String,
    pub appended: usize,
    pub dropped: usize,
    pub stored: usize,
}

/// Appends submitted events to a stored log document.
///
/// Every call is an unguarded read-modify-write: two requests racing on the
/// same key can each overwrite the other's events.
pub struct AppendEventsHandler<TStore>
where
    TStore: ObjectStore + ?Sized + 'static,
{
    store: Arc<TStore>,
    routing: LogRouting,
    max_events: usize,
}

impl<TStore> AppendEventsHandler<TStore>
where
    TStore: ObjectStore + ?Sized + 'static,
{
    pub fn new(store: Arc<TStore>, routing: LogRouting) -> Self {
        Self {
            store,
            routing,
            max_events: DEFAULT_MAX_EVENTS,
        }
    }

    pub fn with_max_events(mut self, max_events: usize) -> Self {
        self.max_events = max_events;
        self
    }

    pub fn routing(&self) -> &LogRouting {
        &self.routing
    }

    pub fn max_events(&self) -> usize {
        self.max_events
    }

    /// Turns one gateway request into a response. Malformed input is never
    /// an error; only store failures produce a 500.
    pub async fn handle(&self, request: IngestRequest) -> IngestResponse {
        if request.is_preflight() {
            debug!("Answered CORS preflight");
            return IngestResponse::no_content();
        }

        match self.append(request).await {
            Ok(_) => IngestResponse::no_content(),
            Err(e) => {
                error!(error = %e, "Failed to append logs");
                IngestResponse::failure(&e)
            }
        }
    }

    pub async fn append(&self, request: IngestRequest) -> Result<AppendOutcome, ApplicationError> {
        let payload = parse_payload(request.body.as_deref(), request.is_base64_encoded);
        let key = self.routing.resolve_key(&payload);
        let new_events = normalize_events(extract_events(&payload), request.received_at);

        let mut document = load_document(&*self.store, &key)
            .await
            .map_err(|source| ApplicationError::Load {
                key: key.clone(),
                source,
            })?;

        if new_events.is_empty() {
            debug!(key = %key, "No events in request, nothing to store");
            return Ok(AppendOutcome {
                stored: document.len(),
                key,
                appended: 0,
                dropped: 0,
            });
        }

        let appended = new_events.len();
        let dropped = document.append(new_events, self.max_events);
        if dropped > 0 {
            debug!(key = %key, dropped, max_events = self.max_events, "Trimmed oldest events");
        }

        save_document(&*self.store, &key, &document)
            .await
            .map_err(|source| ApplicationError::Save {
                key: key.clone(),
                source,
            })?;

        info!(key = %key, received = appended, stored = document.len(), dropped, "Appended events");
        Ok(AppendOutcome {
            stored: document.len(),
            key,
            appended,
            dropped,
        })
    }
}
