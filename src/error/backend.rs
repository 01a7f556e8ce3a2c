//! Errors raised by the backend-as-a-service (accounts and profile rows).

use thiserror::Error;

use crate::traits::{HttpError, StoreError};

/// Backend call failures.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The backend rejected the call. `kind` is the backend's error type tag,
    /// e.g. `user_invalid_credentials`.
    #[error("{message}")]
    Api {
        code: u16,
        kind: String,
        message: String,
    },

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Invalid backend response: {0}")]
    Decode(String),

    /// Persisting or restoring the session cookie failed.
    #[error("Session storage failed: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to get current user after sign in")]
    NoCurrentUser,

    #[error("No authenticated user")]
    NotAuthenticated,
}

impl BackendError {
    /// The backend status code, when the backend answered.
    pub fn code(&self) -> Option<u16> {
        match self {
            BackendError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True when the backend reports a missing session or account (401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendError::Api { code: 401, .. } | BackendError::NotAuthenticated)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::Api { code: 404, .. })
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Api { code, .. } => *code >= 500 || *code == 429,
            BackendError::Http(HttpError::InvalidUrl(_)) => false,
            BackendError::Http(_) => true,
            _ => false,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            BackendError::Api { .. } => "E_BACKEND_API",
            BackendError::Http(_) => "E_BACKEND_TRANSPORT",
            BackendError::Decode(_) => "E_BACKEND_DECODE",
            BackendError::Store(_) => "E_BACKEND_STORE",
            BackendError::NoCurrentUser => "E_BACKEND_NO_USER",
            BackendError::NotAuthenticated => "E_BACKEND_NOT_AUTH",
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(code: u16, message: &str) -> BackendError {
        BackendError::Api {
            code,
            kind: "general_unknown".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_api_error_displays_backend_message() {
        let err = api(401, "Invalid credentials. Please check the email and password.");
        assert_eq!(
            err.to_string(),
            "Invalid credentials. Please check the email and password."
        );
        assert_eq!(err.code(), Some(401));
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_retryable() {
        assert!(api(503, "down").is_retryable());
        assert!(!api(400, "bad").is_retryable());
        assert!(BackendError::Http(HttpError::Timeout("30s".to_string())).is_retryable());
        assert!(!BackendError::NoCurrentUser.is_retryable());
    }

    #[test]
    fn test_not_found() {
        assert!(api(404, "Row not found").is_not_found());
        assert!(!api(500, "boom").is_not_found());
    }
}
