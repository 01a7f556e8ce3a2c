//! Error handling for GifTree.
//!
//! - **Domain errors**: [`ApiError`] for the providers, [`BackendError`] for
//!   accounts and profile rows
//! - **Auth mapping**: [`AuthFailure`] turns backend failures into the text
//!   shown on the auth screens
//! - **Unified error**: [`GifTreeError`] with [`ErrorCategory`] based retry
//!   and messaging decisions
//!
//! The fetch controller has its own error type, [`crate::fetch::FetchError`],
//! because it must hold whatever a producer fails with.

mod api;
mod auth;
mod backend;
mod category;
mod giftree_error;
mod result;

pub use api::ApiError;
pub use auth::{AuthAction, AuthFailure};
pub use backend::BackendError;
pub use category::ErrorCategory;
pub use giftree_error::GifTreeError;
pub use result::GifTreeResult;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::traits::{HttpError, StoreError};

    #[test]
    fn test_error_unification() {
        let errors: Vec<GifTreeError> = vec![
            ApiError::Status {
                status: 404,
                status_text: "Not Found".to_string(),
            }
            .into(),
            BackendError::NoCurrentUser.into(),
            StoreError::Io("disk full".to_string()).into(),
            BackendError::Http(HttpError::Timeout("30s".to_string())).into(),
        ];

        for err in errors {
            assert!(!err.error_code().is_empty());
            assert!(!err.user_message().is_empty());
        }
    }

    #[test]
    fn test_result_alias_with_question_mark() {
        fn load() -> GifTreeResult<u32> {
            let value: Result<u32, ApiError> = Err(ApiError::Decode("eof".to_string()));
            Ok(value?)
        }

        let err = load().unwrap_err();
        assert!(matches!(err, GifTreeError::Api(ApiError::Decode(_))));
    }
}
