//! Unified error type for GifTree.
//!
//! `GifTreeError` consolidates the domain errors so callers at the edges
//! (the binary, view models) can categorize and word them uniformly.

use thiserror::Error;

use super::api::ApiError;
use super::backend::BackendError;
use super::category::ErrorCategory;
use crate::config::ConfigError;
use crate::traits::{SchedulerError, StoreError};
use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum GifTreeError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GifTreeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GifTreeError::Api(ApiError::Status { status, .. })
            | GifTreeError::Backend(BackendError::Api { code: status, .. })
                if *status >= 500 =>
            {
                ErrorCategory::Server
            }
            GifTreeError::Api(ApiError::Http(_)) | GifTreeError::Backend(BackendError::Http(_)) => {
                ErrorCategory::Network
            }
            GifTreeError::Api(_) => ErrorCategory::Server,
            GifTreeError::Backend(err) if err.is_unauthorized() => ErrorCategory::Auth,
            GifTreeError::Backend(BackendError::Store(_)) => ErrorCategory::System,
            GifTreeError::Backend(BackendError::Api { code: 409, .. }) => ErrorCategory::Auth,
            GifTreeError::Backend(_) => ErrorCategory::Server,
            GifTreeError::Store(_) => ErrorCategory::System,
            GifTreeError::Scheduler(_) => ErrorCategory::System,
            GifTreeError::Validation(_) => ErrorCategory::User,
            GifTreeError::Config(_) => ErrorCategory::Configuration,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            GifTreeError::Api(err) => err.is_retryable(),
            GifTreeError::Backend(err) => err.is_retryable(),
            _ => false,
        }
    }

    /// Message suitable for inline display.
    pub fn user_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Server => {
                format!("{}. {}", self, self.category().recovery_hint())
            }
            _ => self.to_string(),
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            GifTreeError::Api(err) => err.error_code(),
            GifTreeError::Backend(err) => err.error_code(),
            GifTreeError::Store(_) => "E_STORE",
            GifTreeError::Scheduler(_) => "E_SCHEDULER",
            GifTreeError::Validation(_) => "E_VALIDATION",
            GifTreeError::Config(_) => "E_CONFIG",
        }
    }
}
