use staffdesk_core::config::SessionSettings;
use staffdesk_core::error::{Result, StaffdeskError};
use staffdesk_core::identity::{Identity, IdentityProvider};
use staffdesk_core::session::{AuthState, SessionPhase, StorageEvent, TabId, TokenStore};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;

/// Owns one tab's authentication session.
///
/// `SessionManager` is responsible for:
/// - Restoring the session from the shared token store at startup
/// - Verifying tokens against the identity provider (bounded by a timeout)
/// - Logging in and out, and mirroring both into the shared store
/// - Folding other tabs' store writes into this tab's state
/// - Publishing every state change to in-page subscribers
///
/// Every login, logout and foreign write bumps an epoch. A verification
/// result is applied only if the epoch and the token it was started for are
/// both still current, so a late answer can never resurrect a session that
/// was superseded in the meantime.
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    provider: Arc<dyn IdentityProvider>,
    verify_timeout: Duration,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<AuthState>,
}

#[derive(Default)]
struct Inner {
    epoch: u64,
    phase: Option<SessionPhase>,
    /// Token awaiting verification.
    pending: Option<String>,
    /// Verified token and the identity it resolved to.
    active: Option<(String, Identity)>,
}

impl Inner {
    fn phase(&self) -> SessionPhase {
        self.phase.unwrap_or(SessionPhase::Uninitialized)
    }

    /// The token this tab currently stands behind, verified or not.
    fn current_token(&self) -> Option<&str> {
        self.pending
            .as_deref()
            .or_else(|| self.active.as_ref().map(|(token, _)| token.as_str()))
    }

    fn snapshot(&self) -> AuthState {
        match (&self.active, self.phase()) {
            (Some((_, identity)), SessionPhase::Authenticated) => {
                AuthState::authenticated(identity.clone())
            }
            (_, SessionPhase::Authenticated) | (_, SessionPhase::Unauthenticated) => {
                AuthState::unauthenticated()
            }
            (_, SessionPhase::Initializing) => AuthState::initializing(),
            (_, SessionPhase::Uninitialized) => AuthState::uninitialized(),
        }
    }
}

/// A verification started under a given epoch for a given token.
#[derive(Debug, Clone)]
pub(crate) struct Verification {
    epoch: u64,
    token: String,
    /// Write the "session changed" marker on success.
    announce: bool,
}

/// What the reducer decided to do with a foreign store write.
pub(crate) enum StorageAction {
    Ignored,
    SignedOut,
    Verify(Verification),
}

impl SessionManager {
    /// Creates a manager in the `Uninitialized` phase.
    ///
    /// # Arguments
    ///
    /// * `store` - This tab's handle on the shared token store
    /// * `provider` - Backend used to verify tokens and exchange credentials
    /// * `settings` - Session settings (verification timeout)
    pub fn new(
        store: Arc<dyn TokenStore>,
        provider: Arc<dyn IdentityProvider>,
        settings: &SessionSettings,
    ) -> Self {
        let (state_tx, _) = watch::channel(AuthState::uninitialized());
        Self {
            store,
            provider,
            verify_timeout: settings.verify_timeout(),
            inner: Mutex::new(Inner::default()),
            state_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The state is replaced wholesale under the lock, so a poisoned guard
        // still holds a consistent value.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, state: AuthState) {
        self.state_tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }

    pub fn tab_id(&self) -> &TabId {
        self.store.tab_id()
    }

    pub(crate) fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    // ============================================================================
    // Queries
    // ============================================================================

    pub fn state(&self) -> AuthState {
        self.state_tx.borrow().clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.lock().phase()
    }

    /// In-page notifications: receives every state change of this tab.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.lock().active.as_ref().map(|(_, identity)| identity.clone())
    }

    /// The verified bearer token, if the session is authenticated.
    pub fn current_token(&self) -> Option<String> {
        self.lock().active.as_ref().map(|(token, _)| token.clone())
    }

    /// Token and identity read together, for callers acting on the user's behalf.
    pub fn credentials(&self) -> Option<(String, Identity)> {
        self.lock().active.clone()
    }

    /// False when unauthenticated or when the identity lacks the role.
    pub fn has_role(&self, name: &str) -> bool {
        self.lock()
            .active
            .as_ref()
            .is_some_and(|(_, identity)| identity.has_role(name))
    }

    pub fn has_any_role<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.lock()
            .active
            .as_ref()
            .is_some_and(|(_, identity)| identity.roles.intersects(names))
    }

    // ============================================================================
    // Transitions
    // ============================================================================

    /// Restores the session from the shared store. Runs once per manager;
    /// later calls return the current state.
    pub async fn initialize(&self) -> AuthState {
        let epoch = {
            let mut inner = self.lock();
            if inner.phase() != SessionPhase::Uninitialized {
                return inner.snapshot();
            }
            inner.phase = Some(SessionPhase::Initializing);
            inner.epoch += 1;
            let epoch = inner.epoch;
            self.publish(inner.snapshot());
            epoch
        };

        let stored = match self.store.load() {
            Ok(record) => record.and_then(|r| r.active_token().map(str::to_string)),
            Err(e) => {
                tracing::warn!(tab = %self.tab_id(), error = %e, "failed to read token store");
                None
            }
        };

        let Some(token) = stored else {
            let mut inner = self.lock();
            if inner.epoch == epoch {
                inner.phase = Some(SessionPhase::Unauthenticated);
                tracing::info!(tab = %self.tab_id(), "no stored session");
            }
            let state = inner.snapshot();
            self.publish(state.clone());
            return state;
        };

        let verification = {
            let mut inner = self.lock();
            if inner.epoch != epoch {
                return inner.snapshot();
            }
            inner.pending = Some(token.clone());
            Verification {
                epoch,
                token,
                announce: true,
            }
        };

        self.run_verification(verification).await
    }

    /// Logs in with a fresh token: persists it, then verifies it.
    ///
    /// Never fails; a rejected token leaves the session `Unauthenticated`
    /// with no persisted token. Inspect the returned state.
    pub async fn login(&self, token: &str) -> AuthState {
        let token = token.trim();
        if token.is_empty() {
            tracing::info!(tab = %self.tab_id(), "empty token treated as failed login");
            self.logout();
            return self.state();
        }

        let verification = {
            let mut inner = self.lock();
            inner.epoch += 1;
            inner.pending = Some(token.to_string());
            if inner.phase() == SessionPhase::Uninitialized {
                inner.phase = Some(SessionPhase::Initializing);
                self.publish(inner.snapshot());
            }
            Verification {
                epoch: inner.epoch,
                token: token.to_string(),
                announce: false,
            }
        };

        if let Err(e) = self.store.save_token(token) {
            tracing::warn!(tab = %self.tab_id(), error = %e, "failed to persist token");
        }

        self.run_verification(verification).await
    }

    /// Exchanges credentials for a token, then proceeds as [`login`](Self::login).
    ///
    /// # Errors
    ///
    /// Returns the provider's error when the credentials are rejected or the
    /// exchange fails; the session is left as it was.
    pub async fn login_with_credentials(&self, email: &str, password: &str) -> Result<AuthState> {
        let token = tokio::time::timeout(self.verify_timeout, self.provider.authenticate(email, password))
            .await
            .map_err(|_| StaffdeskError::timeout("credential exchange timed out"))??;
        Ok(self.login(&token).await)
    }

    /// Clears the session and the shared token. Synchronous and idempotent.
    pub fn logout(&self) {
        {
            let mut inner = self.lock();
            inner.epoch += 1;
            let had_session = inner.current_token().is_some();
            inner.pending = None;
            inner.active = None;
            inner.phase = Some(SessionPhase::Unauthenticated);
            if had_session {
                tracing::info!(tab = %self.tab_id(), "logged out");
            }
            self.publish(inner.snapshot());
        }

        match self.store.load() {
            Ok(Some(record)) if record.active_token().is_none() => {}
            Ok(None) => {}
            _ => {
                if let Err(e) = self.store.clear() {
                    tracing::warn!(tab = %self.tab_id(), error = %e, "failed to clear token store");
                }
            }
        }
    }

    /// Applies another tab's store write and waits for any resulting
    /// verification.
    pub async fn handle_storage_event(&self, event: StorageEvent) -> AuthState {
        match self.reduce_storage_event(&event) {
            StorageAction::Verify(verification) => self.run_verification(verification).await,
            StorageAction::Ignored | StorageAction::SignedOut => self.state(),
        }
    }

    /// The synchronous half of [`handle_storage_event`](Self::handle_storage_event):
    /// updates state immediately and returns the verification to run, if any.
    pub(crate) fn reduce_storage_event(&self, event: &StorageEvent) -> StorageAction {
        if event.origin == *self.tab_id() {
            return StorageAction::Ignored;
        }

        let mut inner = self.lock();
        if inner.phase() == SessionPhase::Uninitialized {
            return StorageAction::Ignored;
        }

        match (event.record.active_token(), inner.current_token()) {
            (Some(theirs), ours) if Some(theirs) != ours => {
                inner.epoch += 1;
                inner.pending = Some(theirs.to_string());
                tracing::info!(tab = %self.tab_id(), from = %event.origin, "login in another tab, re-verifying");
                StorageAction::Verify(Verification {
                    epoch: inner.epoch,
                    token: theirs.to_string(),
                    announce: false,
                })
            }
            (None, Some(_)) => {
                inner.epoch += 1;
                inner.pending = None;
                inner.active = None;
                inner.phase = Some(SessionPhase::Unauthenticated);
                tracing::info!(tab = %self.tab_id(), from = %event.origin, "logout in another tab");
                self.publish(inner.snapshot());
                StorageAction::SignedOut
            }
            _ => StorageAction::Ignored,
        }
    }

    /// Verifies `verification.token` and applies the outcome if still current.
    pub(crate) async fn run_verification(&self, verification: Verification) -> AuthState {
        let outcome = match tokio::time::timeout(
            self.verify_timeout,
            self.provider.verify(&verification.token),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(StaffdeskError::timeout(format!(
                "identity verification exceeded {:?}",
                self.verify_timeout
            ))),
        };

        self.apply_verification(verification, outcome)
    }

    fn apply_verification(&self, verification: Verification, outcome: Result<Identity>) -> AuthState {
        let mut inner = self.lock();
        let current = inner.epoch == verification.epoch
            && inner.pending.as_deref() == Some(verification.token.as_str());
        if !current {
            tracing::debug!(
                tab = %self.tab_id(),
                epoch = verification.epoch,
                latest = inner.epoch,
                "discarding stale verification result"
            );
            return inner.snapshot();
        }

        inner.pending = None;
        match outcome {
            Ok(identity) => {
                tracing::info!(tab = %self.tab_id(), user = %identity.id, "session authenticated");
                inner.active = Some((verification.token.clone(), identity));
                inner.phase = Some(SessionPhase::Authenticated);
                let state = inner.snapshot();
                self.publish(state.clone());
                drop(inner);

                if verification.announce {
                    if let Err(e) = self.store.save_token(&verification.token) {
                        tracing::warn!(tab = %self.tab_id(), error = %e, "failed to write session marker");
                    }
                }
                state
            }
            Err(e) => {
                tracing::info!(tab = %self.tab_id(), error = %e, "verification failed, session cleared");
                inner.active = None;
                inner.phase = Some(SessionPhase::Unauthenticated);
                let state = inner.snapshot();
                self.publish(state.clone());
                drop(inner);

                self.clear_stored_token(&verification.token);
                state
            }
        }
    }

    /// Removes `token` from the shared store unless another tab already
    /// replaced it with something newer.
    fn clear_stored_token(&self, token: &str) {
        let stale = match self.store.load() {
            Ok(Some(record)) => record.active_token() == Some(token),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(tab = %self.tab_id(), error = %e, "failed to read token store");
                true
            }
        };
        if stale {
            if let Err(e) = self.store.clear() {
                tracing::warn!(tab = %self.tab_id(), error = %e, "failed to clear token store");
            }
        }
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
