//! Directory service trait definition.

use async_trait::async_trait;

use super::model::{Branch, Department, Employee};
use crate::error::Result;

/// Read access to the backend's directory collections.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Server-side filtered employee search, already scoped to the caller's
    /// permissions by the backend.
    ///
    /// # Arguments
    /// * `token` - Bearer credential of the caller
    /// * `query` - Free-text search string
    /// * `limit` - Maximum number of records the server should return
    async fn search_employees(&self, token: &str, query: &str, limit: usize)
        -> Result<Vec<Employee>>;

    /// Full department collection (filtered client-side).
    async fn list_departments(&self, token: &str) -> Result<Vec<Department>>;

    /// Full branch collection (filtered client-side).
    async fn list_branches(&self, token: &str) -> Result<Vec<Branch>>;
}
