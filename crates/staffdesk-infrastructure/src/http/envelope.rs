//! Normalization of list responses.
//!
//! Listing endpoints answer either with a bare JSON array or with an
//! envelope object (`{ "data": [...], "count": n }`, or `results` for
//! paginated views). This is the only place that knows about both shapes.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A list response with its rows still undecoded.
///
/// Rows are converted one by one in [`into_items`](Self::into_items), so a
/// single malformed record drops only itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope {
    Bare(Vec<Value>),
    Enveloped {
        #[serde(alias = "results", alias = "items")]
        data: Vec<Value>,
        #[serde(default)]
        count: Option<u64>,
    },
}

impl ListEnvelope {
    /// Decodes every row as `T`, skipping (and logging) rows that don't fit.
    pub fn into_items<T: DeserializeOwned>(self) -> Vec<T> {
        let rows = match self {
            Self::Bare(rows) => rows,
            Self::Enveloped { data, .. } => data,
        };
        rows.into_iter()
            .enumerate()
            .filter_map(|(index, row)| match serde_json::from_value(row) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed list row");
                    None
                }
            })
            .collect()
    }

    /// Total reported by the server, or the page length if it sent none.
    pub fn total(&self) -> u64 {
        match self {
            Self::Bare(rows) => rows.len() as u64,
            Self::Enveloped { data, count } => count.unwrap_or(data.len() as u64),
        }
    }
}
