//! Identity provider trait definition.

use async_trait::async_trait;

use super::model::Identity;
use crate::error::Result;

/// Backend that owns credentials and identities.
///
/// Implementations must map authentication failures to
/// [`StaffdeskError::Unauthorized`](crate::error::StaffdeskError::Unauthorized)
/// so callers can tell a rejected token from a transport failure.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves the identity behind a bearer token (`GET /users/me`).
    async fn verify(&self, token: &str) -> Result<Identity>;

    /// Exchanges credentials for a fresh bearer token (`POST /auth/login`).
    async fn authenticate(&self, email: &str, password: &str) -> Result<String>;
}
