use crate::modules::event_log::core::events::LogEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_MAX_EVENTS: usize = 10_000;

/// The full ordered log stored under one key, oldest entry first.
///
/// Entries already in the store are kept exactly as read, whatever their
/// shape; only incoming events are required to be objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogDocument {
    entries: Vec<Value>,
}

impl LogDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Value>) -> Self {
        Self { entries }
    }

    pub fn from_events(events: Vec<LogEvent>) -> Self {
        Self::from_entries(events.into_iter().map(Value::from).collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    /// Appends in arrival order, then keeps only the trailing `max_events`
    /// entries. Returns how many of the oldest entries were dropped.
    pub fn append(&mut self, new_events: Vec<LogEvent>, max_events: usize) -> usize {
        self.entries.extend(new_events.into_iter().map(Value::from));
        let overflow = self.entries.len().saturating_sub(max_events);
        if overflow > 0 {
            self.entries.drain(..overflow);
        }
        overflow
    }
}
