//! HTTP boundary: the shared client and the response-shape adapter.

mod client;
mod envelope;

pub use client::ApiClient;
pub use envelope::ListEnvelope;
