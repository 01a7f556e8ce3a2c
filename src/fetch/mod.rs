//! Generic async data fetching with `{data, loading, error}` state.
//!
//! A [`FetchController`] wraps a zero-argument async producer. Views read
//! [`FetchState`] snapshots (or subscribe to changes) and call
//! [`FetchController::refetch`] / [`FetchController::reset`].
//!
//! Every call is tagged with a generation number taken when it starts. A
//! settlement is applied only if no newer call and no reset happened in
//! between, so overlapping refetches always end in the latest call's outcome.
//!
//! ```ignore
//! let cats = FetchController::new(move || { let api = api.clone(); async move { api.fetch_cat_gif().await } }, true);
//! cats.mount();
//! let mut changes = cats.subscribe();
//! while changes.changed().await.is_ok() {
//!     render(&changes.borrow());
//! }
//! ```

mod error;
mod state;

pub use error::{FetchError, UnknownError, UNKNOWN_ERROR_MESSAGE};
pub use state::FetchState;

use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

type Producer<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, FetchError>> + Send + Sync>;

#[derive(Debug, Default)]
struct Gate {
    /// Bumped by every refetch and reset.
    generation: u64,
    auto_fetch: bool,
    mounted: bool,
}

/// Owns the lifecycle of calls to one producer.
///
/// Cloning yields another handle to the same controller. Methods that start
/// a call spawn onto the current tokio runtime and must be called from
/// within one.
pub struct FetchController<T> {
    producer: Producer<T>,
    gate: Arc<Mutex<Gate>>,
    state: Arc<watch::Sender<FetchState<T>>>,
}

impl<T> Clone for FetchController<T> {
    fn clone(&self) -> Self {
        Self {
            producer: Arc::clone(&self.producer),
            gate: Arc::clone(&self.gate),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> FetchController<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a controller. No call is made until [`mount`](Self::mount).
    ///
    /// With `auto_fetch` the initial state is already `loading` so the first
    /// render shows a spinner rather than an empty view.
    pub fn new<F, Fut, E>(producer: F, auto_fetch: bool) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let producer: Producer<T> = Arc::new(move || {
            let call = producer();
            async move { call.await.map_err(FetchError::new) }.boxed()
        });
        let initial = if auto_fetch {
            FetchState::pending()
        } else {
            FetchState::idle()
        };
        let (state, _) = watch::channel(initial);

        Self {
            producer,
            gate: Arc::new(Mutex::new(Gate {
                auto_fetch,
                ..Gate::default()
            })),
            state: Arc::new(state),
        }
    }

    /// One-time activation. Starts the first call when auto-fetch is on.
    ///
    /// Later calls do nothing and return `None`.
    pub fn mount(&self) -> Option<JoinHandle<()>> {
        let should_fetch = {
            let mut gate = self.lock_gate();
            if gate.mounted {
                return None;
            }
            gate.mounted = true;
            gate.auto_fetch
        };
        should_fetch.then(|| self.refetch())
    }

    /// Update the auto-fetch flag.
    ///
    /// Only a `false -> true` transition on a mounted controller starts a
    /// call. Setting the flag to its current value does nothing.
    pub fn set_auto_fetch(&self, enabled: bool) -> Option<JoinHandle<()>> {
        let should_fetch = {
            let mut gate = self.lock_gate();
            let rising = enabled && !gate.auto_fetch;
            gate.auto_fetch = enabled;
            rising && gate.mounted
        };
        should_fetch.then(|| self.refetch())
    }

    /// Start a new call regardless of the auto-fetch flag.
    ///
    /// `loading` is set before this returns. Data and error from earlier
    /// calls stay visible until the new call settles. The returned handle
    /// completes once the settlement was applied or discarded.
    pub fn refetch(&self) -> JoinHandle<()> {
        let generation = {
            let mut gate = self.lock_gate();
            gate.generation = gate.generation.wrapping_add(1);
            self.state.send_modify(|state| state.loading = true);
            gate.generation
        };
        tracing::debug!(generation, "fetch started");

        let producer = Arc::clone(&self.producer);
        let gate = Arc::clone(&self.gate);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            let call = AssertUnwindSafe(async move { producer().await });
            let outcome = match call.catch_unwind().await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(generation, "fetch producer panicked");
                    Err(FetchError::unknown())
                }
            };
            settle(&gate, &state, generation, outcome);
        })
    }

    /// Clear data and error and stop showing a spinner.
    ///
    /// In-flight calls keep running but their settlements are discarded.
    pub fn reset(&self) {
        let mut gate = self.lock_gate();
        gate.generation = gate.generation.wrapping_add(1);
        self.state.send_modify(|state| *state = FetchState::idle());
        tracing::debug!(generation = gate.generation, "fetch state reset");
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FetchState<T> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<T>> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn auto_fetch(&self) -> bool {
        self.lock_gate().auto_fetch
    }

    pub fn is_mounted(&self) -> bool {
        self.lock_gate().mounted
    }

    fn lock_gate(&self) -> MutexGuard<'_, Gate> {
        lock(&self.gate)
    }
}

fn lock(gate: &Mutex<Gate>) -> MutexGuard<'_, Gate> {
    gate.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Apply a settlement if it belongs to the latest call.
///
/// The gate stays locked while the state is written so a concurrent
/// refetch or reset cannot interleave between the check and the write.
fn settle<T>(
    gate: &Mutex<Gate>,
    state: &watch::Sender<FetchState<T>>,
    generation: u64,
    outcome: Result<T, FetchError>,
) {
    let gate = lock(gate);
    if gate.generation != generation {
        tracing::debug!(
            generation,
            current = gate.generation,
            "discarding stale fetch settlement"
        );
        return;
    }

    state.send_modify(|state| {
        match outcome {
            Ok(data) => {
                state.data = Some(data);
                state.error = None;
            }
            Err(err) => {
                tracing::debug!(generation, error = %err, "fetch failed");
                state.error = Some(err);
            }
        }
        state.loading = false;
    });
}
