//! Employee directory domain module.
//!
//! Records returned by the backend listing endpoints and the service trait
//! that fetches them.

mod model;
mod service;

pub use model::{Branch, Department, Employee};
pub use service::DirectoryService;
