//! Session state published to in-page subscribers.

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::identity::Identity;

/// Lifecycle phase of a tab's session.
///
/// `Uninitialized` and `Initializing` occur once per tab; afterwards the
/// session cycles between `Authenticated` and `Unauthenticated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionPhase {
    Uninitialized,
    Initializing,
    Authenticated,
    Unauthenticated,
}

/// Snapshot of a tab's session.
///
/// `identity` is `Some` exactly when `phase == Authenticated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    pub phase: SessionPhase,
    pub identity: Option<Identity>,
}

impl AuthState {
    pub fn uninitialized() -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            identity: None,
        }
    }

    pub fn initializing() -> Self {
        Self {
            phase: SessionPhase::Initializing,
            identity: None,
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            phase: SessionPhase::Unauthenticated,
            identity: None,
        }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            phase: SessionPhase::Authenticated,
            identity: Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::uninitialized()
    }
}
