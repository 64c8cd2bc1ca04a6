//! Session domain module.
//!
//! This module contains the per-tab authentication state, the durable token
//! record shared between tabs, and the storage trait that carries it.
//!
//! # Module Structure
//!
//! - `model`: Session phases and the published `AuthState`
//! - `event`: `StoredSession` record, `StorageEvent` and the foreign-tab subscription
//! - `store`: `TokenStore` trait for the shared durable store

mod event;
mod model;
mod store;

// Re-export public API
pub use event::{StorageEvent, StorageSubscription, StoredSession, TabId};
pub use model::{AuthState, SessionPhase};
pub use store::TokenStore;
