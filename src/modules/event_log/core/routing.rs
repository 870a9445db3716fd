use crate::modules::event_log::core::identity::resolve_identity;
use serde_json::Value;

pub const DEFAULT_LOG_KEY: &str = "logs/latest.json";
pub const DEFAULT_LOG_PREFIX: &str = "logs";

/// Chooses which stored document a submission is appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRouting {
    /// Every submission goes to one document.
    Fixed { key: String },
    /// One document per submitter, at `<prefix>/<identity>.json`.
    PerIdentity { prefix: String },
}

impl LogRouting {
    pub fn fixed(key: impl Into<String>) -> Self {
        Self::Fixed { key: key.into() }
    }

    pub fn per_identity(prefix: impl Into<String>) -> Self {
        Self::PerIdentity {
            prefix: prefix.into(),
        }
    }

    pub fn resolve_key(&self, payload: &Value) -> String {
        match self {
            Self::Fixed { key } => key.clone(),
            Self::PerIdentity { prefix } => {
                let identity = resolve_identity(payload);
                match prefix.trim_end_matches('/') {
                    "" => format!("{identity}.json"),
                    prefix => format!("{prefix}/{identity}.json"),
                }
            }
        }
    }
}

impl Default for LogRouting {
    fn default() -> Self {
        Self::fixed(DEFAULT_LOG_KEY)
    }
}
