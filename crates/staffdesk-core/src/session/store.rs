//! Token store trait definition.

use super::event::{StorageSubscription, StoredSession, TabId};
use crate::error::Result;

/// One tab's handle on the origin-wide durable token store.
///
/// Operations are synchronous: a single write is atomic, and logout must be
/// able to clear the token without awaiting anything.
pub trait TokenStore: Send + Sync {
    /// The tab this handle writes on behalf of.
    fn tab_id(&self) -> &TabId;

    /// Reads the current shared record, if one was ever written.
    fn load(&self) -> Result<Option<StoredSession>>;

    /// Persists `token` and notifies the other tabs.
    fn save_token(&self, token: &str) -> Result<StoredSession>;

    /// Removes the token and notifies the other tabs.
    fn clear(&self) -> Result<StoredSession>;

    /// Subscribes to writes made by other tabs.
    fn subscribe(&self) -> StorageSubscription;
}
