pub mod config;
pub mod directory;
pub mod error;
pub mod identity;
pub mod search;
pub mod session;

// Re-export common error type
pub use error::{Result, StaffdeskError};
