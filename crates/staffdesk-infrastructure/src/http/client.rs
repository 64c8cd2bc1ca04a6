//! JSON-over-HTTP client for the Staffdesk backend.

use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use staffdesk_core::config::ApiSettings;
use staffdesk_core::error::{Result, StaffdeskError};

use super::envelope::ListEnvelope;

/// Thin wrapper over `reqwest::Client` that knows the API base URL,
/// attaches bearer credentials, and maps failures into `StaffdeskError`.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| StaffdeskError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, &settings.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// `GET path?query` decoded as `T`.
    pub async fn get_json<T>(&self, path: &str, token: Option<&str>, query: &[(&str, String)]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = self.client.get(self.url(path)).query(query);
        let response = Self::authorize(request, token).send().await?;
        Self::decode(response).await
    }

    /// `GET path?query` for listing endpoints; accepts either response shape.
    pub async fn get_list<T>(&self, path: &str, token: Option<&str>, query: &[(&str, String)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let list: ListEnvelope = self.get_json(path, token, query).await?;
        let total = list.total();
        let items: Vec<T> = list.into_items();
        tracing::debug!(path, total, returned = items.len(), "list fetched");
        Ok(items)
    }

    /// `POST path` with a JSON body, decoded as `T`.
    pub async fn post_json<B, T>(&self, path: &str, token: Option<&str>, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        let response = Self::authorize(request, token).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            };
            return Err(StaffdeskError::from_status(status.as_u16(), message));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
