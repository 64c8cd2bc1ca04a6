//! HTTP-backed identity provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use staffdesk_core::error::{Result, StaffdeskError};
use staffdesk_core::identity::{Identity, IdentityProvider};

use crate::http::ApiClient;

const ME_PATH: &str = "users/me";
const LOGIN_PATH: &str = "auth/login";

/// Verifies tokens against `GET /users/me` and exchanges credentials at
/// `POST /auth/login`.
#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: ApiClient,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MeResponse {
    Wrapped { user: Identity },
    Plain(Identity),
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default, alias = "token")]
    access_token: Option<String>,
}

impl HttpIdentityProvider {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify(&self, token: &str) -> Result<Identity> {
        let response: MeResponse = self.client.get_json(ME_PATH, Some(token), &[]).await?;
        let identity = match response {
            MeResponse::Wrapped { user } => user,
            MeResponse::Plain(identity) => identity,
        };
        tracing::debug!(user = %identity.id, roles = identity.roles.len(), "identity verified");
        Ok(identity)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<String> {
        let response: LoginResponse = self
            .client
            .post_json(LOGIN_PATH, None, &LoginRequest { email, password })
            .await?;

        response
            .access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| StaffdeskError::unauthorized("login response did not include a token"))
    }
}
