//! Errors raised by the cat-image and plant-data providers.

use thiserror::Error;

use crate::traits::HttpError;

/// Provider call failures.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The provider answered with a non-2xx status.
    #[error("Network response was not ok: {status_text}")]
    Status { status: u16, status_text: String },

    /// The request never produced a response.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The body could not be decoded into the expected shape.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Status { status, .. } => *status >= 500 || *status == 429,
            ApiError::Http(HttpError::InvalidUrl(_)) => false,
            ApiError::Http(_) => true,
            ApiError::Decode(_) => false,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Status { .. } => "E_API_STATUS",
            ApiError::Http(_) => "E_API_TRANSPORT",
            ApiError::Decode(_) => "E_API_DECODE",
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}
