//! HTTP-backed directory listings.

use async_trait::async_trait;
use staffdesk_core::directory::{Branch, Department, DirectoryService, Employee};
use staffdesk_core::error::Result;

use crate::http::ApiClient;

#[derive(Clone)]
pub struct HttpDirectoryService {
    client: ApiClient,
}

impl HttpDirectoryService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DirectoryService for HttpDirectoryService {
    async fn search_employees(&self, token: &str, query: &str, limit: usize) -> Result<Vec<Employee>> {
        self.client
            .get_list(
                "employees",
                Some(token),
                &[("search", query.to_string()), ("limit", limit.to_string())],
            )
            .await
    }

    async fn list_departments(&self, token: &str) -> Result<Vec<Department>> {
        self.client.get_list("departments", Some(token), &[]).await
    }

    async fn list_branches(&self, token: &str) -> Result<Vec<Branch>> {
        self.client.get_list("branches", Some(token), &[]).await
    }
}
