//! Identity domain module.
//!
//! # Module Structure
//!
//! - `model`: Authenticated identity and role set
//! - `provider`: Backend identity verification trait
//!
//! # Usage
//!
//! ```ignore
//! use staffdesk_core::identity::{Identity, IdentityProvider, RoleSet};
//! ```

mod model;
mod provider;

// Re-export public API
pub use model::{Identity, RoleSet};
pub use provider::IdentityProvider;

pub(crate) use model::deserialize_id;
