use serde::Serialize;
use staffdesk_core::search::{SearchQuery, SearchResult};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::aggregator::SearchAggregator;
use crate::session::SessionManager;

/// What the search widget renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchView {
    /// Raw input text, exactly as typed.
    pub text: String,
    pub results: Vec<SearchResult>,
    pub loading: bool,
    /// Whether the result panel is shown.
    pub open: bool,
    /// Id of the most recently issued search. Only a run carrying this id
    /// may touch `results` or `loading`.
    pub sequence: u64,
}

/// Keyboard input the widget reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// The global "focus search" shortcut.
    Shortcut,
    Escape,
}

/// Turns keystrokes into debounced, race-free searches.
///
/// Each keystroke issues a new sequence id. A scheduled run waits out the
/// quiet period, gives up if a newer keystroke arrived, and publishes its
/// results only if it is still the latest once the aggregate resolves.
/// Superseded runs are left to finish and their results are dropped.
#[derive(Clone)]
pub struct SearchController {
    inner: Arc<Inner>,
}

struct Inner {
    aggregator: SearchAggregator,
    session: Arc<SessionManager>,
    view: watch::Sender<SearchView>,
    scheduled: Mutex<Option<JoinHandle<()>>>,
}

impl SearchController {
    pub fn new(aggregator: SearchAggregator, session: Arc<SessionManager>) -> Self {
        let (view, _) = watch::channel(SearchView::default());
        Self {
            inner: Arc::new(Inner {
                aggregator,
                session,
                view,
                scheduled: Mutex::new(None),
            }),
        }
    }

    pub fn snapshot(&self) -> SearchView {
        self.inner.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.inner.view.subscribe()
    }

    /// Handles a change of the input text.
    pub fn on_input(&self, text: &str) {
        let settings = self.inner.aggregator.settings();
        let query = SearchQuery::parse(text, settings.min_query_len);

        let mut sequence = 0;
        self.inner.view.send_modify(|view| {
            view.sequence += 1;
            sequence = view.sequence;
            view.text = text.to_string();
            if query.is_some() {
                view.loading = true;
                view.open = true;
            } else {
                view.results.clear();
                view.loading = false;
            }
        });

        let Some(query) = query else {
            return;
        };

        let inner = Arc::clone(&self.inner);
        let debounce = settings.debounce();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if !inner.is_current(sequence) {
                return;
            }
            inner.run(sequence, query).await;
        });

        // The previous run is detached, not aborted.
        *self.lock_scheduled() = Some(handle);
    }

    /// Picks a result: resets the widget and returns where to navigate.
    pub fn select(&self, result: &SearchResult) -> String {
        self.inner.view.send_modify(|view| {
            view.sequence += 1;
            view.text.clear();
            view.results.clear();
            view.loading = false;
            view.open = false;
        });
        tracing::debug!(kind = %result.kind, id = %result.id, "search result selected");
        result.target_location.clone()
    }

    pub fn handle_key(&self, key: Key) {
        match key {
            Key::Shortcut => self.set_open(true),
            Key::Escape => self.set_open(false),
        }
    }

    pub fn click_outside(&self) {
        self.set_open(false);
    }

    /// Waits for the most recently scheduled run to finish.
    pub async fn flush(&self) {
        let handle = self.lock_scheduled().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "search task failed");
            }
        }
    }

    fn set_open(&self, open: bool) {
        self.inner.view.send_if_modified(|view| {
            let changed = view.open != open;
            view.open = open;
            changed
        });
    }

    fn lock_scheduled(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner
            .scheduled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Inner {
    fn is_current(&self, sequence: u64) -> bool {
        self.view.borrow().sequence == sequence
    }

    async fn run(&self, sequence: u64, query: SearchQuery) {
        // Roles are read at dispatch time, not when the key was pressed.
        let results = match self.session.credentials() {
            Some((token, identity)) => {
                self.aggregator
                    .aggregate(&token, &query, &identity.roles)
                    .await
            }
            None => {
                tracing::debug!(query = query.as_str(), "search skipped without a session");
                Vec::new()
            }
        };

        let applied = self.view.send_if_modified(|view| {
            if view.sequence != sequence {
                return false;
            }
            view.results = results;
            view.loading = false;
            true
        });
        if !applied {
            tracing::debug!(sequence, query = query.as_str(), "discarding superseded search results");
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
