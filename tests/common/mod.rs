//! Common test utilities for integration tests.
//!
//! # Example
//!
//! ```ignore
//! let (producer, responders, calls) = controlled_producer::<String>();
//! let controller = FetchController::new(producer, false);
//! let first = controller.refetch();
//! responders.respond(Ok("first".to_string()));
//! ```

#![allow(dead_code)]

use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use giftree::adapters::mock::MockBackend;
use giftree::config::BackendConfig;
use giftree::progress::Progress;
use giftree::session::SessionProvider;

pub const TEST_USER_ID: &str = "user-123";
pub const TEST_EMAIL: &str = "test@example.com";
pub const TEST_PASSWORD: &str = "password123";
pub const TEST_NICKNAME: &str = "TestNick";

/// Error type for controlled producers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct TestError(pub String);

/// A backend with the test user and a live session.
pub fn signed_in_backend(progress: Progress) -> MockBackend {
    MockBackend::new()
        .with_user(TEST_USER_ID, TEST_EMAIL, TEST_PASSWORD, TEST_NICKNAME, progress)
        .signed_in_as(TEST_USER_ID)
}

pub fn session_for(backend: &MockBackend) -> SessionProvider {
    SessionProvider::new(Arc::new(backend.clone()), Arc::new(backend.clone()))
}

/// A session with the test user restored.
pub async fn signed_in_session(progress: Progress) -> (MockBackend, SessionProvider) {
    let backend = signed_in_backend(progress);
    let session = session_for(&backend);
    session.initialize().await;
    (backend, session)
}

pub fn backend_config(endpoint: &str) -> BackendConfig {
    BackendConfig {
        endpoint: endpoint.to_string(),
        project_id: "test-project".to_string(),
        database_id: "main".to_string(),
        users_table_id: "user-profiles".to_string(),
    }
}

type Pending<T> = oneshot::Sender<Result<T, TestError>>;

/// Settles controlled producer calls in any order.
#[derive(Clone)]
pub struct Responders<T> {
    pending: Arc<Mutex<Vec<Option<Pending<T>>>>>,
}

impl<T> Responders<T> {
    /// Settle the `index`th call (0-based, in call order).
    pub fn respond(&self, index: usize, result: Result<T, TestError>) {
        let sender = self.pending.lock().unwrap()[index]
            .take()
            .expect("call already settled");
        let _ = sender.send(result);
    }

    pub fn calls(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

/// A producer whose calls stay pending until settled through [`Responders`].
pub fn controlled_producer<T: Send + 'static>() -> (
    impl Fn() -> BoxFuture<'static, Result<T, TestError>> + Send + Sync + 'static,
    Responders<T>,
) {
    let pending: Arc<Mutex<Vec<Option<Pending<T>>>>> = Arc::new(Mutex::new(Vec::new()));
    let responders = Responders {
        pending: Arc::clone(&pending),
    };
    let producer = move || {
        let (tx, rx) = oneshot::channel();
        pending.lock().unwrap().push(Some(tx));
        async move {
            rx.await
                .unwrap_or_else(|_| Err(TestError("dropped".to_string())))
        }
        .boxed()
    };
    (producer, responders)
}

/// A producer returning queued results and counting calls.
pub fn scripted_producer<T: Send + 'static>(
    results: Vec<Result<T, TestError>>,
) -> (
    impl Fn() -> BoxFuture<'static, Result<T, TestError>> + Send + Sync + 'static,
    Arc<AtomicUsize>,
) {
    let queue = Arc::new(Mutex::new(VecDeque::from(results)));
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let producer = move || {
        counter.fetch_add(1, Ordering::SeqCst);
        let next = queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TestError("no more results".to_string())));
        async move { next }.boxed()
    };
    (producer, calls)
}
