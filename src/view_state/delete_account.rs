//! Account deletion confirmation.
//!
//! The user must type their nickname before the account is deleted.

use crate::error::{AuthAction, AuthFailure};
use crate::session::SessionProvider;

pub const NICKNAME_MISMATCH: &str = "Nickname doesn't match. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NicknameMismatch,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteAccountFlow {
    pub is_open: bool,
    pub nickname_input: String,
    pub is_deleting: bool,
    pub error: Option<String>,
}

impl DeleteAccountFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.nickname_input.clear();
        self.error = None;
    }

    /// Typing clears a previous error.
    pub fn set_nickname_input(&mut self, text: impl Into<String>) {
        self.nickname_input = text.into();
        self.error = None;
    }

    /// Delete the account if the typed nickname matches exactly.
    ///
    /// On success the dialog closes. On failure it stays open with the
    /// error so the user can retry.
    pub async fn confirm(&mut self, session: &SessionProvider) -> DeleteOutcome {
        let nickname = session.user().await.map(|user| user.nickname);
        if nickname.as_deref() != Some(self.nickname_input.as_str()) {
            self.error = Some(NICKNAME_MISMATCH.to_string());
            return DeleteOutcome::NicknameMismatch;
        }

        self.error = None;
        self.is_deleting = true;
        let result = session.delete_account().await;
        self.is_deleting = false;

        match result {
            Ok(()) => {
                self.close();
                DeleteOutcome::Deleted
            }
            Err(e) => {
                tracing::error!("Error deleting account: {}", e);
                let failure = AuthFailure::classify(AuthAction::DeleteAccount, &e);
                self.error = Some(failure.user_message().to_string());
                DeleteOutcome::Failed
            }
        }
    }
}
