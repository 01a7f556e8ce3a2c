//! Session-level state
//!
//! Holds the signed-in user and the loading flag shown while the stored
//! session is being restored.

use crate::models::User;
use crate::progress::Progress;

/// Result of [`SessionProvider::increment_click_count`](super::SessionProvider::increment_click_count).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementOutcome {
    /// Nobody is signed in; nothing changed.
    NoUser,
    /// The new progress was written to the backend.
    Persisted(Progress),
    /// The write failed and local progress was restored to this value.
    Reverted(Progress),
    /// The write failed but a newer change was applied locally meanwhile,
    /// so local progress was left alone.
    Diverged,
}

impl IncrementOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self, IncrementOutcome::Persisted(_))
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub user: Option<User>,
    /// True until `initialize` finished.
    pub is_loading: bool,
    /// Bumped on every local progress change and every user switch.
    pub(super) revision: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            is_loading: true,
            revision: 0,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn set_user(&mut self, user: Option<User>) {
        self.user = user;
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn progress(&self) -> Option<Progress> {
        self.user.as_ref().map(User::progress)
    }
}
