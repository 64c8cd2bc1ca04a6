//! Client configuration model.
//!
//! Mirrors the layout of `config.toml`. Every section falls back to its
//! defaults so a partial (or missing) file is always valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RootConfig {
    pub api: ApiSettings,
    pub session: SessionSettings,
    pub search: SearchSettings,
    pub logging: LoggingSettings,
}

/// Backend connection settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Session lifecycle settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SessionSettings {
    /// Ceiling for identity verification; expiry counts as a failed verification.
    pub verify_timeout_secs: u64,
    /// Durable token record. `None` resolves to `<config_dir>/session.toml`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_file: Option<PathBuf>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            verify_timeout_secs: 10,
            storage_file: None,
        }
    }
}

impl SessionSettings {
    pub fn verify_timeout(&self) -> Duration {
        Duration::from_secs(self.verify_timeout_secs)
    }
}

/// Federated search tuning.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SearchSettings {
    /// Quiet period after the last keystroke before a search is dispatched.
    pub debounce_ms: u64,
    /// Trimmed queries shorter than this (in characters) never hit the network.
    pub min_query_len: usize,
    /// Server-side cap requested from the employees endpoint.
    pub employee_limit: usize,
    /// Client-side cap applied to each restricted collection.
    pub restricted_limit: usize,
    /// Roles allowed to see departments and branches in results.
    pub elevated_roles: Vec<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_len: 2,
            employee_limit: 5,
            restricted_limit: 3,
            elevated_roles: vec!["admin".to_string(), "hr".to_string()],
        }
    }
}

impl SearchSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
