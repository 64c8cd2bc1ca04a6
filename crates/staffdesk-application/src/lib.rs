//! Application layer for Staffdesk.
//!
//! Coordinates the domain traits from `staffdesk-core` into the two
//! client-side use cases: the per-tab session and federated search.

pub mod search;
pub mod session;

#[cfg(test)]
mod test_support;

pub use search::{Key, SearchAggregator, SearchController, SearchView};
pub use session::SessionManager;
