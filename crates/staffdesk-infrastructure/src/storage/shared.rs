//! Origin-wide durable token store shared by every tab.
//!
//! `SharedStorage` plays the role of the browser's same-origin storage: it
//! holds the single `StoredSession` record and broadcasts each write to all
//! tabs. Each tab talks to it through a `TabStorage` handle, whose
//! subscription filters out the tab's own writes.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use staffdesk_core::error::{Result, StaffdeskError};
use staffdesk_core::session::{StorageEvent, StorageSubscription, StoredSession, TabId, TokenStore};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::atomic_toml::AtomicTomlFile;

const EVENT_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct SharedStorage {
    inner: Arc<Inner>,
}

struct Inner {
    record: Mutex<Option<StoredSession>>,
    file: Option<AtomicTomlFile<StoredSession>>,
    events: broadcast::Sender<StorageEvent>,
}

impl SharedStorage {
    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::build(None, None)
    }

    /// A store persisted to `path`, seeded from the file if it exists.
    ///
    /// The file is the source of truth for reads, so other processes sharing
    /// it (e.g. separate CLI invocations) observe each other's writes.
    ///
    /// An unreadable file is not fatal: reads keep failing until the next
    /// `save_token` or `clear` overwrites it.
    pub fn persistent(path: impl Into<PathBuf>) -> Result<Self> {
        let file = AtomicTomlFile::new(path.into()).private();
        let initial = match file.load() {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(
                    path = %file.path().display(),
                    error = %e,
                    "token store unreadable, starting signed out"
                );
                None
            }
        };
        Ok(Self::build(Some(file), initial))
    }

    fn build(file: Option<AtomicTomlFile<StoredSession>>, initial: Option<StoredSession>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                record: Mutex::new(initial),
                file,
                events,
            }),
        }
    }

    /// Opens a handle for a new tab with a random id.
    pub fn open_tab(&self) -> TabStorage {
        self.open_tab_with_id(TabId::new(Uuid::new_v4().to_string()))
    }

    pub fn open_tab_with_id(&self, tab: TabId) -> TabStorage {
        TabStorage {
            tab,
            shared: self.clone(),
        }
    }

    /// Current record without going through a tab handle.
    pub fn snapshot(&self) -> Result<Option<StoredSession>> {
        self.read()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<StoredSession>>> {
        self.inner
            .record
            .lock()
            .map_err(|e| StaffdeskError::storage(format!("token store lock poisoned: {}", e)))
    }

    fn read(&self) -> Result<Option<StoredSession>> {
        if let Some(file) = &self.inner.file {
            let loaded = file.load()?;
            *self.lock()? = loaded.clone();
            return Ok(loaded);
        }
        Ok(self.lock()?.clone())
    }

    fn write(&self, origin: &TabId, record: StoredSession) -> Result<StoredSession> {
        {
            let mut current = self.lock()?;
            if let Some(file) = &self.inner.file {
                file.replace(&record)?;
            }
            *current = Some(record.clone());
        }

        tracing::debug!(
            tab = %origin,
            signed_in = record.active_token().is_some(),
            "token store written"
        );

        // No receivers just means no other tab is listening.
        let _ = self.inner.events.send(StorageEvent {
            origin: origin.clone(),
            record: record.clone(),
        });
        Ok(record)
    }
}

/// One tab's view of [`SharedStorage`].
#[derive(Clone)]
pub struct TabStorage {
    tab: TabId,
    shared: SharedStorage,
}

impl TokenStore for TabStorage {
    fn tab_id(&self) -> &TabId {
        &self.tab
    }

    fn load(&self) -> Result<Option<StoredSession>> {
        self.shared.read()
    }

    fn save_token(&self, token: &str) -> Result<StoredSession> {
        self.shared.write(&self.tab, StoredSession::signed_in(token))
    }

    fn clear(&self) -> Result<StoredSession> {
        self.shared.write(&self.tab, StoredSession::signed_out())
    }

    fn subscribe(&self) -> StorageSubscription {
        StorageSubscription::new(self.tab.clone(), self.shared.inner.events.subscribe())
    }
}
