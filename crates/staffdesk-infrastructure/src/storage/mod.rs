//! Storage layer for the durable token record.

mod atomic_toml;
mod shared;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
pub use shared::{SharedStorage, TabStorage};
