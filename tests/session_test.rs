//! Integration tests for the session provider and click counting.

mod common;

use async_trait::async_trait;
use common::*;
use giftree::adapters::mock::{BackendCall, MockBackend};
use giftree::error::{AuthAction, AuthFailure, BackendError};
use giftree::models::{AccountInfo, UserProfile};
use giftree::progress::{GoalThreshold, Progress};
use giftree::session::{IncrementOutcome, SessionProvider};
use giftree::traits::{AccountService, ProfileStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, Notify};

#[tokio::test]
async fn test_increment_without_user_is_noop() {
    let backend = MockBackend::new();
    let session = session_for(&backend);
    session.initialize().await;

    assert_eq!(session.increment_click_count().await, IncrementOutcome::NoUser);
    assert!(backend.progress_updates().is_empty());
}

#[tokio::test]
async fn test_increment_persists_both_counters() {
    let (backend, session) = signed_in_session(Progress::new(10, 0)).await;

    let outcome = session.increment_click_count().await;

    assert_eq!(outcome, IncrementOutcome::Persisted(Progress::new(11, 0)));
    assert!(backend.calls().contains(&BackendCall::UpdateProgress {
        user_id: TEST_USER_ID.to_string(),
        progress: Progress::new(11, 0),
    }));
    assert_eq!(session.user().await.unwrap().click_count, 11);
    assert_eq!(backend.stored_progress(TEST_USER_ID), Some(Progress::new(11, 0)));
}

#[tokio::test]
async fn test_increment_at_threshold_completes_goal() {
    let (backend, session) = signed_in_session(Progress::new(1500, 2)).await;

    session.increment_click_count().await;

    let user = session.user().await.unwrap();
    assert_eq!((user.click_count, user.completed_goals), (0, 3));
    assert_eq!(backend.progress_updates(), vec![Progress::new(0, 3)]);
}

#[tokio::test]
async fn test_increment_below_threshold_does_not_roll_over() {
    let (_, session) = signed_in_session(Progress::new(1499, 1)).await;

    session.increment_click_count().await;

    assert_eq!(session.user().await.unwrap().progress(), Progress::new(1500, 1));
}

#[tokio::test]
async fn test_custom_threshold() {
    let backend = signed_in_backend(Progress::new(2, 0));
    let session = SessionProvider::with_threshold(
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
        GoalThreshold::new(2).unwrap(),
    );
    session.initialize().await;

    session.increment_click_count().await;
    assert_eq!(session.user().await.unwrap().progress(), Progress::new(0, 1));
}

#[tokio::test]
async fn test_failed_write_reverts() {
    let (backend, session) = signed_in_session(Progress::new(10, 0)).await;
    backend.set_fail_updates(true);

    let outcome = session.increment_click_count().await;

    assert_eq!(outcome, IncrementOutcome::Reverted(Progress::new(10, 0)));
    assert_eq!(session.user().await.unwrap().progress(), Progress::new(10, 0));
    assert_eq!(backend.stored_progress(TEST_USER_ID), Some(Progress::new(10, 0)));
}

/// Profile store whose first progress write blocks until released and then fails.
struct GatedProfiles {
    inner: MockBackend,
    writes: AtomicUsize,
    entered: Arc<Notify>,
    release: Mutex<Option<oneshot::Receiver<()>>>,
}

#[async_trait]
impl ProfileStore for GatedProfiles {
    async fn create_profile(
        &self,
        user_id: &str,
        nickname: &str,
        email: &str,
    ) -> Result<UserProfile, BackendError> {
        self.inner.create_profile(user_id, nickname, email).await
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, BackendError> {
        self.inner.get_profile(user_id).await
    }

    async fn update_progress(&self, user_id: &str, progress: Progress) -> Result<(), BackendError> {
        if self.writes.fetch_add(1, Ordering::SeqCst) == 0 {
            let release = self.release.lock().unwrap().take();
            self.entered.notify_one();
            if let Some(release) = release {
                let _ = release.await;
            }
            return Err(BackendError::Api {
                code: 503,
                kind: "general_server_error".to_string(),
                message: "Service Unavailable".to_string(),
            });
        }
        self.inner.update_progress(user_id, progress).await
    }

    async fn delete_profile(&self, user_id: &str) -> Result<(), BackendError> {
        self.inner.delete_profile(user_id).await
    }
}

#[tokio::test]
async fn test_late_failure_does_not_revert_newer_progress() {
    let backend = signed_in_backend(Progress::new(10, 0));
    let entered = Arc::new(Notify::new());
    let (release_tx, release_rx) = oneshot::channel();
    let profiles = Arc::new(GatedProfiles {
        inner: backend.clone(),
        writes: AtomicUsize::new(0),
        entered: Arc::clone(&entered),
        release: Mutex::new(Some(release_rx)),
    });
    let session = SessionProvider::new(Arc::new(backend.clone()), profiles);
    session.initialize().await;

    let slow = {
        let session = session.clone();
        tokio::spawn(async move { session.increment_click_count().await })
    };
    entered.notified().await;

    // A second click lands while the first write is still in flight
    let second = session.increment_click_count().await;
    assert_eq!(second, IncrementOutcome::Persisted(Progress::new(12, 0)));

    release_tx.send(()).unwrap();
    assert_eq!(slow.await.unwrap(), IncrementOutcome::Diverged);
    assert_eq!(session.user().await.unwrap().progress(), Progress::new(12, 0));
}

#[tokio::test]
async fn test_sign_in_loads_profile() {
    let backend = MockBackend::new().with_user(
        TEST_USER_ID,
        TEST_EMAIL,
        TEST_PASSWORD,
        TEST_NICKNAME,
        Progress::new(300, 4),
    );
    let session = session_for(&backend);
    session.initialize().await;
    assert!(session.user().await.is_none());

    let user = session.sign_in(TEST_EMAIL, TEST_PASSWORD).await.unwrap();

    assert_eq!(user.id, TEST_USER_ID);
    assert_eq!(user.nickname, TEST_NICKNAME);
    assert_eq!(user.progress(), Progress::new(300, 4));
    assert_eq!(session.user().await, Some(user));
}

#[tokio::test]
async fn test_sign_in_with_wrong_password() {
    let backend = signed_in_backend(Progress::default());
    let session = session_for(&backend);

    let err = session.sign_in(TEST_EMAIL, "wrong-password").await.unwrap_err();

    let failure = AuthFailure::classify(AuthAction::SignIn, &err);
    assert_eq!(failure.user_message(), "Invalid email or password");
    assert!(session.user().await.is_none());
}

#[tokio::test]
async fn test_sign_up_duplicate_email() {
    let backend = signed_in_backend(Progress::default());
    let session = session_for(&backend);

    let err = session
        .sign_up(TEST_EMAIL, TEST_PASSWORD, "Other")
        .await
        .unwrap_err();

    assert_eq!(
        AuthFailure::classify(AuthAction::SignUp, &err).user_message(),
        "An account with this email already exists"
    );
}

#[tokio::test]
async fn test_new_account_starts_at_zero_and_counts() {
    let backend = MockBackend::new();
    let session = session_for(&backend);

    let user = session
        .sign_up("new@example.com", TEST_PASSWORD, "Sprout")
        .await
        .unwrap();
    session.increment_click_count().await;

    assert_eq!(backend.stored_progress(&user.id), Some(Progress::new(1, 0)));
}

#[tokio::test]
async fn test_missing_profile_means_default_progress() {
    let backend = signed_in_backend(Progress::new(5, 5));
    backend.delete_profile(TEST_USER_ID).await.unwrap();
    let session = session_for(&backend);

    let user = session.initialize().await.unwrap();
    assert_eq!(user.progress(), Progress::default());
}

#[tokio::test]
async fn test_sign_out_clears_user() {
    let (backend, session) = signed_in_session(Progress::default()).await;

    session.sign_out().await.unwrap();

    assert!(session.user().await.is_none());
    assert!(!backend.has_session());
    assert_eq!(session.increment_click_count().await, IncrementOutcome::NoUser);
}

#[tokio::test]
async fn test_delete_account_removes_profile_then_disables() {
    let (backend, session) = signed_in_session(Progress::default()).await;

    session.delete_account().await.unwrap();

    let calls = backend.calls();
    let delete = calls
        .iter()
        .position(|c| matches!(c, BackendCall::DeleteProfile { .. }))
        .unwrap();
    let disable = calls
        .iter()
        .position(|c| *c == BackendCall::DisableAccount)
        .unwrap();
    assert!(delete < disable);
    assert!(session.user().await.is_none());
}

#[tokio::test]
async fn test_expired_reset_link() {
    let backend = MockBackend::new();
    let session = session_for(&backend);

    let err = session
        .complete_password_reset(TEST_USER_ID, "expired", "newpassword1")
        .await
        .unwrap_err();

    assert_eq!(
        AuthFailure::classify(AuthAction::PasswordRecovery, &err).user_message(),
        "Reset link has expired. Please request a new one."
    );
}

/// Account service whose first lookup blocks until released.
struct GatedAccounts {
    inner: MockBackend,
    lookups: AtomicUsize,
    entered: Arc<Notify>,
    release: Mutex<Option<oneshot::Receiver<()>>>,
}

impl GatedAccounts {
    fn new(inner: MockBackend) -> (Arc<Self>, Arc<Notify>, oneshot::Sender<()>) {
        let entered = Arc::new(Notify::new());
        let (release_tx, release_rx) = oneshot::channel();
        let accounts = Arc::new(Self {
            inner,
            lookups: AtomicUsize::new(0),
            entered: Arc::clone(&entered),
            release: Mutex::new(Some(release_rx)),
        });
        (accounts, entered, release_tx)
    }
}

#[async_trait]
impl AccountService for GatedAccounts {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AccountInfo, BackendError> {
        self.inner.create_account(email, password, name).await
    }

    async fn create_email_session(&self, email: &str, password: &str) -> Result<(), BackendError> {
        self.inner.create_email_session(email, password).await
    }

    async fn current_account(&self) -> Result<Option<AccountInfo>, BackendError> {
        if self.lookups.fetch_add(1, Ordering::SeqCst) == 0 {
            // Read before blocking, like a response already on the wire.
            let account = self.inner.current_account().await;
            let release = self.release.lock().unwrap().take();
            self.entered.notify_one();
            if let Some(release) = release {
                let _ = release.await;
            }
            return account;
        }
        self.inner.current_account().await
    }

    async fn delete_current_session(&self) -> Result<(), BackendError> {
        self.inner.delete_current_session().await
    }

    async fn create_recovery(&self, email: &str, redirect_url: &str) -> Result<(), BackendError> {
        self.inner.create_recovery(email, redirect_url).await
    }

    async fn update_recovery(
        &self,
        user_id: &str,
        secret: &str,
        password: &str,
    ) -> Result<(), BackendError> {
        self.inner.update_recovery(user_id, secret, password).await
    }

    async fn disable_account(&self) -> Result<(), BackendError> {
        self.inner.disable_account().await
    }
}

#[tokio::test]
async fn test_sign_out_during_restore_stays_signed_out() {
    let backend = signed_in_backend(Progress::new(5, 0));
    let (accounts, entered, release) = GatedAccounts::new(backend.clone());
    let session = SessionProvider::new(accounts, Arc::new(backend.clone()));

    let restore = {
        let session = session.clone();
        tokio::spawn(async move { session.initialize().await })
    };
    entered.notified().await;

    session.sign_out().await.unwrap();
    release.send(()).unwrap();

    assert!(restore.await.unwrap().is_none());
    assert!(!backend.has_session());
    assert!(session.user().await.is_none());
    assert!(!session.is_loading().await);
    assert_eq!(session.increment_click_count().await, IncrementOutcome::NoUser);
    assert!(backend.progress_updates().is_empty());
}

#[tokio::test]
async fn test_concurrent_initialize_waits_for_restore() {
    let backend = signed_in_backend(Progress::new(7, 2));
    let (accounts, entered, release) = GatedAccounts::new(backend.clone());
    let session = SessionProvider::new(accounts.clone(), Arc::new(backend.clone()));

    let first = {
        let session = session.clone();
        tokio::spawn(async move { session.initialize().await })
    };
    entered.notified().await;

    let second = {
        let session = session.clone();
        tokio::spawn(async move { session.initialize().await })
    };
    tokio::task::yield_now().await;
    assert!(!second.is_finished());

    release.send(()).unwrap();

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();
    assert_eq!(first.id, TEST_USER_ID);
    assert_eq!(second.progress(), Progress::new(7, 2));
    assert_eq!(accounts.lookups.load(Ordering::SeqCst), 1);
}
