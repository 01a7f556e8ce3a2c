//! In-memory backend for testing the session provider.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::BackendError;
use crate::models::{AccountInfo, UserProfile};
use crate::progress::Progress;
use crate::traits::{AccountService, ProfileStore};

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    CreateAccount { email: String, name: String },
    CreateSession { email: String },
    CurrentAccount,
    DeleteSession,
    CreateRecovery { email: String, url: String },
    UpdateRecovery { user_id: String, secret: String },
    DisableAccount,
    CreateProfile { user_id: String, nickname: String },
    GetProfile { user_id: String },
    UpdateProgress { user_id: String, progress: Progress },
    DeleteProfile { user_id: String },
}

#[derive(Debug, Default)]
struct Inner {
    /// email -> (account, password)
    accounts: HashMap<String, (AccountInfo, String)>,
    profiles: HashMap<String, UserProfile>,
    session: Option<String>,
    calls: Vec<BackendCall>,
    fail_updates: bool,
    fail_delete_profile: bool,
    next_id: u32,
}

/// Backend double implementing [`AccountService`] and [`ProfileStore`].
///
/// Mirrors the real backend's observable behavior: duplicate emails are
/// rejected with 409, wrong passwords with 401 "Invalid credentials".
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<Inner>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account with a profile row.
    pub fn with_user(
        self,
        id: &str,
        email: &str,
        password: &str,
        nickname: &str,
        progress: Progress,
    ) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let account = AccountInfo {
                id: id.to_string(),
                email: email.to_string(),
                name: nickname.to_string(),
            };
            inner
                .accounts
                .insert(email.to_string(), (account, password.to_string()));
            inner.profiles.insert(
                id.to_string(),
                UserProfile {
                    id: id.to_string(),
                    nickname: nickname.to_string(),
                    email: email.to_string(),
                    click_count: Some(progress.click_count),
                    completed_goals: Some(progress.completed_goals),
                },
            );
        }
        self
    }

    /// Start with an active session for `user_id`.
    pub fn signed_in_as(self, user_id: &str) -> Self {
        self.inner.lock().unwrap().session = Some(user_id.to_string());
        self
    }

    pub fn set_fail_updates(&self, fail: bool) {
        self.inner.lock().unwrap().fail_updates = fail;
    }

    pub fn set_fail_delete_profile(&self, fail: bool) {
        self.inner.lock().unwrap().fail_delete_profile = fail;
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Progress updates in the order they were received.
    pub fn progress_updates(&self) -> Vec<Progress> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::UpdateProgress { progress, .. } => Some(progress),
                _ => None,
            })
            .collect()
    }

    pub fn stored_progress(&self, user_id: &str) -> Option<Progress> {
        self.inner
            .lock()
            .unwrap()
            .profiles
            .get(user_id)
            .map(UserProfile::progress)
    }

    pub fn has_session(&self) -> bool {
        self.inner.lock().unwrap().session.is_some()
    }

    fn record(&self, call: BackendCall) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

fn api_error(code: u16, kind: &str, message: &str) -> BackendError {
    BackendError::Api {
        code,
        kind: kind.to_string(),
        message: message.to_string(),
    }
}

#[async_trait]
impl AccountService for MockBackend {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AccountInfo, BackendError> {
        self.record(BackendCall::CreateAccount {
            email: email.to_string(),
            name: name.to_string(),
        });
        let mut inner = self.inner.lock().unwrap();
        if inner.accounts.contains_key(email) {
            return Err(api_error(
                409,
                "user_already_exists",
                "A user with the same id, email, or phone already exists in this project.",
            ));
        }
        inner.next_id += 1;
        let account = AccountInfo {
            id: format!("new-user-{}", inner.next_id),
            email: email.to_string(),
            name: name.to_string(),
        };
        inner
            .accounts
            .insert(email.to_string(), (account.clone(), password.to_string()));
        Ok(account)
    }

    async fn create_email_session(&self, email: &str, password: &str) -> Result<(), BackendError> {
        self.record(BackendCall::CreateSession {
            email: email.to_string(),
        });
        let mut inner = self.inner.lock().unwrap();
        let user_id = match inner.accounts.get(email) {
            Some((account, stored)) if stored == password => account.id.clone(),
            _ => {
                return Err(api_error(
                    401,
                    "user_invalid_credentials",
                    "Invalid credentials. Please check the email and password.",
                ))
            }
        };
        inner.session = Some(user_id);
        Ok(())
    }

    async fn current_account(&self) -> Result<Option<AccountInfo>, BackendError> {
        self.record(BackendCall::CurrentAccount);
        let inner = self.inner.lock().unwrap();
        let Some(session) = inner.session.as_ref() else {
            return Ok(None);
        };
        Ok(inner
            .accounts
            .values()
            .map(|(account, _)| account)
            .find(|account| &account.id == session)
            .cloned())
    }

    async fn delete_current_session(&self) -> Result<(), BackendError> {
        self.record(BackendCall::DeleteSession);
        self.inner.lock().unwrap().session = None;
        Ok(())
    }

    async fn create_recovery(&self, email: &str, redirect_url: &str) -> Result<(), BackendError> {
        self.record(BackendCall::CreateRecovery {
            email: email.to_string(),
            url: redirect_url.to_string(),
        });
        Ok(())
    }

    async fn update_recovery(
        &self,
        user_id: &str,
        secret: &str,
        password: &str,
    ) -> Result<(), BackendError> {
        self.record(BackendCall::UpdateRecovery {
            user_id: user_id.to_string(),
            secret: secret.to_string(),
        });
        if secret == "expired" {
            return Err(api_error(
                401,
                "user_invalid_token",
                "The recovery token has expired",
            ));
        }
        let mut inner = self.inner.lock().unwrap();
        if let Some((_, stored)) = inner
            .accounts
            .values_mut()
            .find(|(account, _)| account.id == user_id)
        {
            *stored = password.to_string();
        }
        Ok(())
    }

    async fn disable_account(&self) -> Result<(), BackendError> {
        self.record(BackendCall::DisableAccount);
        let mut inner = self.inner.lock().unwrap();
        let Some(user_id) = inner.session.take() else {
            return Err(BackendError::NotAuthenticated);
        };
        inner.accounts.retain(|_, (account, _)| account.id != user_id);
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for MockBackend {
    async fn create_profile(
        &self,
        user_id: &str,
        nickname: &str,
        email: &str,
    ) -> Result<UserProfile, BackendError> {
        self.record(BackendCall::CreateProfile {
            user_id: user_id.to_string(),
            nickname: nickname.to_string(),
        });
        let profile = UserProfile {
            id: user_id.to_string(),
            nickname: nickname.to_string(),
            email: email.to_string(),
            click_count: None,
            completed_goals: None,
        };
        self.inner
            .lock()
            .unwrap()
            .profiles
            .insert(user_id.to_string(), profile.clone());
        Ok(profile)
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, BackendError> {
        self.record(BackendCall::GetProfile {
            user_id: user_id.to_string(),
        });
        self.inner
            .lock()
            .unwrap()
            .profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| {
                api_error(
                    404,
                    "row_not_found",
                    "Row with the requested ID could not be found.",
                )
            })
    }

    async fn update_progress(&self, user_id: &str, progress: Progress) -> Result<(), BackendError> {
        self.record(BackendCall::UpdateProgress {
            user_id: user_id.to_string(),
            progress,
        });
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_updates {
            return Err(api_error(503, "general_server_error", "Service Unavailable"));
        }
        if let Some(profile) = inner.profiles.get_mut(user_id) {
            profile.click_count = Some(progress.click_count);
            profile.completed_goals = Some(progress.completed_goals);
        }
        Ok(())
    }

    async fn delete_profile(&self, user_id: &str) -> Result<(), BackendError> {
        self.record(BackendCall::DeleteProfile {
            user_id: user_id.to_string(),
        });
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_delete_profile {
            return Err(api_error(500, "general_server_error", "Internal Server Error"));
        }
        inner.profiles.remove(user_id);
        Ok(())
    }
}
