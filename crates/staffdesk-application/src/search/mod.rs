//! Federated search: the stateless fan-out and the stateful widget driver.

mod aggregator;
mod controller;

pub use aggregator::SearchAggregator;
pub use controller::{Key, SearchController, SearchView};
