//! Error types for the Staffdesk client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every Staffdesk crate.
///
/// Variants are structured so callers can branch on the failure class
/// (authentication, transport, storage) without parsing messages.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum StaffdeskError {
    /// The backend rejected the credential (HTTP 401/403 or a rejected login)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Non-success HTTP status other than an authentication failure
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection-level failure (DNS, refused, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// An operation exceeded its deadline
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StaffdeskError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a Timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Maps an HTTP status code and body to the matching variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(message.into()),
            _ => Self::Http {
                status,
                message: message.into(),
            },
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an authentication failure
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Check if this is a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true for failures that might succeed on a later attempt.
    ///
    /// Nothing in the client retries automatically; the flag is exposed so the
    /// UI layer can decide how to phrase the re-login prompt.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for StaffdeskError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for StaffdeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for StaffdeskError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for StaffdeskError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for StaffdeskError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::from_status(status.as_u16(), err.to_string());
        }
        if err.is_decode() {
            return Self::Serialization {
                format: "JSON".to_string(),
                message: err.to_string(),
            };
        }
        Self::Network(err.to_string())
    }
}

/// Conversion from anyhow::Error (used at the CLI boundary)
impl From<anyhow::Error> for StaffdeskError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, StaffdeskError>`.
pub type Result<T> = std::result::Result<T, StaffdeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_maps_auth_codes() {
        assert!(StaffdeskError::from_status(401, "expired").is_unauthorized());
        assert!(StaffdeskError::from_status(403, "forbidden").is_unauthorized());
        assert!(matches!(
            StaffdeskError::from_status(500, "boom"),
            StaffdeskError::Http { status: 500, .. }
        ));
    }

    #[test]
    fn test_is_transient() {
        assert!(StaffdeskError::Network("reset".into()).is_transient());
        assert!(StaffdeskError::timeout("10s").is_transient());
        assert!(StaffdeskError::from_status(503, "unavailable").is_transient());
        assert!(!StaffdeskError::from_status(404, "missing").is_transient());
        assert!(!StaffdeskError::unauthorized("expired").is_transient());
    }

    #[test]
    fn test_io_error_conversion_keeps_kind() {
        let err: StaffdeskError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "session.toml").into();
        match err {
            StaffdeskError::Io { message } => assert!(message.contains("NotFound")),
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
