//! Backend-as-a-service abstractions.
//!
//! The backend provides email/password accounts with sessions, and a table of
//! user-profile rows keyed by account id. Both are consumed through these
//! traits so the session provider can be tested without a network.

use async_trait::async_trait;

use crate::error::BackendError;
use crate::models::{AccountInfo, UserProfile};
use crate::progress::Progress;

/// Account and session operations.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account. Does not create a session.
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AccountInfo, BackendError>;

    /// Create an email/password session and keep it for later calls.
    async fn create_email_session(&self, email: &str, password: &str) -> Result<(), BackendError>;

    /// The account owning the current session, or `None` without a session.
    async fn current_account(&self) -> Result<Option<AccountInfo>, BackendError>;

    /// End the current session.
    async fn delete_current_session(&self) -> Result<(), BackendError>;

    /// Send a password recovery email linking to `redirect_url`.
    async fn create_recovery(&self, email: &str, redirect_url: &str) -> Result<(), BackendError>;

    /// Complete password recovery with the secret from the recovery link.
    async fn update_recovery(
        &self,
        user_id: &str,
        secret: &str,
        password: &str,
    ) -> Result<(), BackendError>;

    /// Disable the current account. Ends all of its sessions.
    async fn disable_account(&self) -> Result<(), BackendError>;
}

/// User-profile row storage.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Create the profile row for a new account, readable and writable only
    /// by that account.
    async fn create_profile(
        &self,
        user_id: &str,
        nickname: &str,
        email: &str,
    ) -> Result<UserProfile, BackendError>;

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, BackendError>;

    /// Write both progress counters in one update.
    async fn update_progress(&self, user_id: &str, progress: Progress) -> Result<(), BackendError>;

    async fn delete_profile(&self, user_id: &str) -> Result<(), BackendError>;
}
