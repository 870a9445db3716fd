use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

use crate::modules::event_log::core::document::DEFAULT_MAX_EVENTS;
use crate::modules::event_log::core::routing::{DEFAULT_LOG_KEY, DEFAULT_LOG_PREFIX, LogRouting};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} is required")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Memory,
    Filesystem {
        root: PathBuf,
    },
    S3 {
        bucket: String,
        endpoint: Option<String>,
        region: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub routing: LogRouting,
    pub max_events: usize,
    pub store: StoreConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let bind_addr_raw = var("EVENT_LOG_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr: SocketAddr =
            bind_addr_raw
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    name: "EVENT_LOG_BIND_ADDR",
                    value: bind_addr_raw.clone(),
                    reason: e.to_string(),
                })?;

        let routing = match var("EVENT_LOG_ROUTING").as_deref() {
            None | Some("fixed") => {
                LogRouting::fixed(var("EVENT_LOG_KEY").unwrap_or_else(|| DEFAULT_LOG_KEY.into()))
            }
            Some("per_identity") => LogRouting::per_identity(
                var("EVENT_LOG_PREFIX").unwrap_or_else(|| DEFAULT_LOG_PREFIX.into()),
            ),
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "EVENT_LOG_ROUTING",
                    value: other.into(),
                    reason: "expected fixed or per_identity".into(),
                });
            }
        };

        let max_events = match var("EVENT_LOG_MAX_EVENTS") {
            None => DEFAULT_MAX_EVENTS,
            Some(raw) => match raw.parse::<usize>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        name: "EVENT_LOG_MAX_EVENTS",
                        value: raw,
                        reason: "must be greater than zero".into(),
                    });
                }
                Ok(max) => max,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: "EVENT_LOG_MAX_EVENTS",
                        reason: e.to_string(),
                        value: raw,
                    });
                }
            },
        };

        let store = match var("EVENT_LOG_STORE").as_deref() {
            None | Some("memory") => StoreConfig::Memory,
            Some("filesystem") => StoreConfig::Filesystem {
                root: PathBuf::from(
                    var("EVENT_LOG_DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.into()),
                ),
            },
            Some("s3") => StoreConfig::S3 {
                bucket: var("EVENT_LOG_BUCKET").ok_or(ConfigError::Missing("EVENT_LOG_BUCKET"))?,
                endpoint: var("EVENT_LOG_S3_ENDPOINT"),
                region: var("EVENT_LOG_S3_REGION"),
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "EVENT_LOG_STORE",
                    value: other.into(),
                    reason: "expected memory, filesystem or s3".into(),
                });
            }
        };

        Ok(Self {
            bind_addr,
            routing,
            max_events,
            store,
        })
    }
}
