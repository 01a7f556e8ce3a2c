//! The authenticated user and everything that changes it.
//!
//! [`SessionProvider`] is the single owner of the signed-in [`User`]. It is a
//! cheap cloneable handle; pass it to whatever needs the user instead of
//! reaching for a global.
//!
//! Click counting is optimistic: the in-memory user is updated first and the
//! backend write follows. A failed write is rolled back only when nothing
//! else touched the user's progress since, so a late failure can never put
//! back a value that is already stale.

mod state;

pub use state::{IncrementOutcome, SessionState};

use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};

use crate::error::BackendError;
use crate::models::{AccountInfo, User};
use crate::progress::GoalThreshold;
use crate::traits::{AccountService, ProfileStore};

/// Deep link opened by the password recovery email.
pub const RESET_PASSWORD_REDIRECT_URL: &str = "gifttree://reset-password";

struct Inner {
    accounts: Arc<dyn AccountService>,
    profiles: Arc<dyn ProfileStore>,
    threshold: GoalThreshold,
    state: RwLock<SessionState>,
    restored: OnceCell<()>,
}

#[derive(Clone)]
pub struct SessionProvider {
    inner: Arc<Inner>,
}

impl SessionProvider {
    pub fn new(accounts: Arc<dyn AccountService>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self::with_threshold(accounts, profiles, GoalThreshold::default())
    }

    pub fn with_threshold(
        accounts: Arc<dyn AccountService>,
        profiles: Arc<dyn ProfileStore>,
        threshold: GoalThreshold,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                accounts,
                profiles,
                threshold,
                state: RwLock::new(SessionState::new()),
                restored: OnceCell::new(),
            }),
        }
    }

    pub fn threshold(&self) -> GoalThreshold {
        self.inner.threshold
    }

    /// Snapshot of the signed-in user.
    pub async fn user(&self) -> Option<User> {
        self.inner.state.read().await.user.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.is_loading
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.state.read().await.clone()
    }

    /// Restore the stored session, once.
    ///
    /// Callers arriving while the restore runs wait for it. Failures are
    /// logged and leave nobody signed in. `is_loading` is false afterwards in
    /// every case.
    pub async fn initialize(&self) -> Option<User> {
        self.inner.restored.get_or_init(|| self.restore()).await;
        self.user().await
    }

    async fn restore(&self) {
        let revision = self.inner.state.read().await.revision;

        let user = match self.inner.accounts.current_account().await {
            Ok(Some(account)) => Some(self.load_user(&account).await),
            Ok(None) => {
                tracing::debug!("No stored session");
                None
            }
            Err(e) => {
                tracing::warn!("Failed to restore session: {}", e);
                None
            }
        };

        let mut state = self.inner.state.write().await;
        // A sign-in or sign-out that finished while we were loading wins.
        if state.revision == revision {
            state.set_user(user);
        } else {
            tracing::debug!("Session changed during restore; keeping it");
        }
        state.is_loading = false;
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<User, BackendError> {
        self.inner
            .accounts
            .create_email_session(email, password)
            .await?;
        let account = self
            .inner
            .accounts
            .current_account()
            .await?
            .ok_or(BackendError::NoCurrentUser)?;
        let user = self.load_user(&account).await;

        tracing::info!("Signed in as {}", user.id);
        self.inner.state.write().await.set_user(Some(user.clone()));
        Ok(user)
    }

    /// Create an account, sign in and create its profile row.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
    ) -> Result<User, BackendError> {
        let account = self
            .inner
            .accounts
            .create_account(email, password, nickname)
            .await?;
        self.inner
            .accounts
            .create_email_session(email, password)
            .await?;
        let profile = self
            .inner
            .profiles
            .create_profile(&account.id, nickname, email)
            .await?;

        let user = User::from_parts(&account, Some(&profile));
        tracing::info!("Created account {}", user.id);
        self.inner.state.write().await.set_user(Some(user.clone()));
        Ok(user)
    }

    /// End the session. The local user is cleared even if the backend call
    /// fails, since the stored session is dropped either way.
    pub async fn sign_out(&self) -> Result<(), BackendError> {
        let result = self.inner.accounts.delete_current_session().await;
        self.inner.state.write().await.set_user(None);
        if let Err(e) = &result {
            tracing::warn!("Sign out failed: {}", e);
        }
        result
    }

    /// Delete the profile row, then disable the account.
    pub async fn delete_account(&self) -> Result<(), BackendError> {
        let user_id = self
            .user()
            .await
            .map(|user| user.id)
            .ok_or(BackendError::NotAuthenticated)?;

        self.inner.profiles.delete_profile(&user_id).await?;
        self.inner.accounts.disable_account().await?;

        tracing::info!("Deleted account {}", user_id);
        self.inner.state.write().await.set_user(None);
        Ok(())
    }

    pub async fn send_password_reset(&self, email: &str) -> Result<(), BackendError> {
        self.inner
            .accounts
            .create_recovery(email, RESET_PASSWORD_REDIRECT_URL)
            .await
    }

    pub async fn complete_password_reset(
        &self,
        user_id: &str,
        secret: &str,
        password: &str,
    ) -> Result<(), BackendError> {
        self.inner
            .accounts
            .update_recovery(user_id, secret, password)
            .await
    }

    /// Count one click for the signed-in user.
    pub async fn increment_click_count(&self) -> IncrementOutcome {
        let (user_id, previous, next, revision) = {
            let mut state = self.inner.state.write().await;
            let Some(user) = state.user.as_mut() else {
                return IncrementOutcome::NoUser;
            };
            let previous = user.progress();
            let next = previous.next(self.inner.threshold);
            user.set_progress(next);
            let user_id = user.id.clone();
            state.revision = state.revision.wrapping_add(1);
            (user_id, previous, next, state.revision)
        };

        if next.completed_goals > previous.completed_goals {
            tracing::info!("Goal completed: {} trees", next.completed_goals);
        }

        match self.inner.profiles.update_progress(&user_id, next).await {
            Ok(()) => IncrementOutcome::Persisted(next),
            Err(e) => {
                tracing::error!("Failed to save progress for {}: {}", user_id, e);
                let mut state = self.inner.state.write().await;
                if state.revision != revision {
                    tracing::debug!("Progress changed since the failed write; keeping it");
                    return IncrementOutcome::Diverged;
                }
                match state.user.as_mut() {
                    Some(user) => {
                        user.set_progress(previous);
                        state.revision = state.revision.wrapping_add(1);
                        IncrementOutcome::Reverted(previous)
                    }
                    None => IncrementOutcome::Diverged,
                }
            }
        }
    }

    async fn load_user(&self, account: &AccountInfo) -> User {
        match self.inner.profiles.get_profile(&account.id).await {
            Ok(profile) => User::from_parts(account, Some(&profile)),
            Err(e) => {
                tracing::warn!("No profile for {}: {}", account.id, e);
                User::from_parts(account, None)
            }
        }
    }
}
