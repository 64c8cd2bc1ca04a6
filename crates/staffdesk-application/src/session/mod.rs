//! Per-tab session management.

mod manager;
mod sync;

pub use manager::SessionManager;
