//! Cross-tab synchronization: feeds foreign store writes into a tab's
//! session reducer.

use std::sync::Arc;
use tokio::task::JoinHandle;

use super::manager::{SessionManager, StorageAction};

impl SessionManager {
    /// Spawns the task that listens for other tabs' writes to the shared
    /// token store and applies them to this session.
    ///
    /// Events are reduced in arrival order, so state flips (e.g. logout
    /// elsewhere) are visible as soon as the event is received. Re-verifications
    /// run concurrently; the epoch guard keeps only the newest one.
    ///
    /// The task ends when the shared store is dropped or the handle is aborted.
    pub fn spawn_storage_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        let mut subscription = manager.store().subscribe();

        tokio::spawn(async move {
            tracing::debug!(tab = %subscription.tab(), "storage listener started");

            while let Some(event) = subscription.recv().await {
                match manager.reduce_storage_event(&event) {
                    StorageAction::Verify(verification) => {
                        let manager = Arc::clone(&manager);
                        tokio::spawn(async move {
                            manager.run_verification(verification).await;
                        });
                    }
                    StorageAction::SignedOut | StorageAction::Ignored => {}
                }
            }

            tracing::debug!(tab = %subscription.tab(), "storage listener stopped");
        })
    }
}
