//! Federated directory search domain.
//!
//! Search fans out over three collections:
//! - Employees (primary, scoped by the backend)
//! - Departments (restricted, elevated roles only)
//! - Branches (restricted, elevated roles only)

pub mod model;

pub use model::{ResultKind, SearchQuery, SearchResult};
