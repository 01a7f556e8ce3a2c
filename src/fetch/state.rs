//! Render-ready view of a fetch.

use super::error::FetchError;

/// What a view renders: the latest data, whether a call is in flight, and
/// the error of the latest settled call.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<FetchError>,
}

impl<T> FetchState<T> {
    /// Nothing fetched, nothing in flight.
    pub fn idle() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }

    /// Nothing fetched yet, first call about to start.
    pub fn pending() -> Self {
        Self {
            loading: true,
            ..Self::idle()
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(FetchError::message)
    }
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::idle()
    }
}
