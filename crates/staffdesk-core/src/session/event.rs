//! Cross-tab session change records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Identifier of one tab (one `SessionManager` instance) within an origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(String);

impl TabId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The durable "session changed" marker shared by every tab of an origin.
///
/// Writes are last-write-wins; `changed_at` records when the write happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub changed_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn signed_in(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            changed_at: Utc::now(),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            token: None,
            changed_at: Utc::now(),
        }
    }

    /// The token, treating an empty string the same as no token.
    pub fn active_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// A write to the shared store, tagged with the tab that made it.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageEvent {
    pub origin: TabId,
    pub record: StoredSession,
}

/// Change notifications for writes made by *other* tabs.
///
/// Writes from the owning tab are skipped, matching how storage events
/// never fire in the tab that performed the write.
pub struct StorageSubscription {
    tab: TabId,
    receiver: broadcast::Receiver<StorageEvent>,
}

impl StorageSubscription {
    pub fn new(tab: TabId, receiver: broadcast::Receiver<StorageEvent>) -> Self {
        Self { tab, receiver }
    }

    pub fn tab(&self) -> &TabId {
        &self.tab
    }

    /// Waits for the next foreign write. Returns `None` once the store is gone.
    ///
    /// If this subscriber fell behind, intermediate events are dropped and
    /// the next one is delivered; only the latest record matters because
    /// every receiver re-verifies whatever token it ends up with.
    pub async fn recv(&mut self) -> Option<StorageEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.origin == self.tab => continue,
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(tab = %self.tab, skipped, "storage subscription lagged");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
