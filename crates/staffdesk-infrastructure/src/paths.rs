//! Unified path management for staffdesk files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/staffdesk/         # Config directory (platform dependent)
//! ├── config.toml              # Client configuration
//! └── session.toml             # Durable token record (mode 600)
//! ```

use staffdesk_core::error::{Result, StaffdeskError};
use std::path::PathBuf;

const APP_DIR: &str = "staffdesk";

pub struct StaffdeskPaths;

impl StaffdeskPaths {
    /// Returns the staffdesk configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/staffdesk/`)
    /// - `Err(StaffdeskError::Config)`: The platform has no config directory
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| StaffdeskError::config("Cannot find home directory"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default path of the durable token record.
    pub fn session_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("session.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_config_dir() {
        let Ok(config_dir) = StaffdeskPaths::config_dir() else {
            // Headless CI without a home directory
            return;
        };
        assert!(config_dir.ends_with("staffdesk"));

        let config_file = StaffdeskPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        assert!(config_file.starts_with(&config_dir));

        let session_file = StaffdeskPaths::session_file().unwrap();
        assert!(session_file.ends_with("session.toml"));
        assert!(session_file.starts_with(&config_dir));
    }
}
