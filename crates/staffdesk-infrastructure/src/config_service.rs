//! Configuration service implementation.
//!
//! Loads `RootConfig` from `config.toml` (default location or an explicit
//! path), applies `STAFFDESK_*` environment overrides, and caches the result.

use crate::paths::StaffdeskPaths;
use staffdesk_core::config::RootConfig;
use staffdesk_core::error::{Result, StaffdeskError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

pub const ENV_API_URL: &str = "STAFFDESK_API_URL";
pub const ENV_LOG: &str = "STAFFDESK_LOG";

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Uses `path` if given, otherwise `~/.config/staffdesk/config.toml`.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file yields defaults; an unreadable or malformed file is a
    /// `Config` error.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let read_lock = self
                .config
                .read()
                .map_err(|e| StaffdeskError::internal(format!("config cache poisoned: {}", e)))?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let path = match &self.path {
            Some(path) => path.clone(),
            None => StaffdeskPaths::config_file()?,
        };
        let mut loaded = Self::load_file(&path)?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        let mut write_lock = self
            .config
            .write()
            .map_err(|e| StaffdeskError::internal(format!("config cache poisoned: {}", e)))?;
        *write_lock = Some(loaded.clone());

        Ok(loaded)
    }

    fn load_file(path: &Path) -> Result<RootConfig> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file missing, using defaults");
            return Ok(RootConfig::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            StaffdeskError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            StaffdeskError::config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Applies environment overrides through `lookup` (injectable for tests).
pub fn apply_env_overrides<F>(config: &mut RootConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config.api.base_url = url;
    }
    if let Some(level) = lookup(ENV_LOG).filter(|v| !v.trim().is_empty()) {
        config.logging.level = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(Some(temp_dir.path().join("config.toml")));
        let config = service.get_config().unwrap();
        assert_eq!(config.search.debounce_ms, 300);
    }

    #[test]
    fn test_loads_and_caches_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nmin_query_len = 3\n").unwrap();

        let service = ConfigService::new(Some(path.clone()));
        assert_eq!(service.get_config().unwrap().search.min_query_len, 3);

        std::fs::write(&path, "[search]\nmin_query_len = 4\n").unwrap();
        assert_eq!(service.get_config().unwrap().search.min_query_len, 3);
        assert_eq!(
            ConfigService::new(Some(path)).get_config().unwrap().search.min_query_len,
            4
        );
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[search\n").unwrap();

        let err = ConfigService::new(Some(path)).get_config().unwrap_err();
        assert!(matches!(err, StaffdeskError::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = RootConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            ENV_API_URL => Some("https://hr.example.com/api".to_string()),
            ENV_LOG => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.api.base_url, "https://hr.example.com/api");
        assert_eq!(config.logging.level, "info");
    }
}
