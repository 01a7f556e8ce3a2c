//! The error held by a [`FetchState`](super::FetchState).

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Message used when a producer fails without an error value.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Stand-in error for producers that panicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("An unknown error occurred")]
pub struct UnknownError;

/// A producer failure, shared between state snapshots.
///
/// The producer's own error is kept as-is and can be recovered with
/// [`FetchError::downcast_ref`].
#[derive(Clone)]
pub struct FetchError {
    inner: Arc<dyn Error + Send + Sync + 'static>,
}

impl FetchError {
    pub fn new<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(err),
        }
    }

    /// The error recorded when a producer panics.
    pub fn unknown() -> Self {
        Self::new(UnknownError)
    }

    pub fn message(&self) -> String {
        self.inner.to_string()
    }

    pub fn is_unknown(&self) -> bool {
        self.inner.is::<UnknownError>()
    }

    /// The producer's error, if it has type `E`.
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }
}

impl fmt::Debug for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner.source()
    }
}

/// Errors compare by message; the original values need not be comparable.
impl PartialEq for FetchError {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.message() == other.message()
    }
}
