//! Mapping of auth failures to the messages shown on the auth screens.
//!
//! The backend only distinguishes failures by status code and message text,
//! so classification follows the message conventions the backend uses.

use super::backend::BackendError;

/// Which auth screen the failure happened on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    SignIn,
    SignUp,
    PasswordRecovery,
    DeleteAccount,
}

/// User-facing classification of an auth failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    InvalidCredentials,
    InvalidEmail,
    AccountExists,
    AccountDisabled,
    WeakPassword,
    ResetLinkExpired,
    ResetRequestFailed,
    DeleteFailed,
    Unknown,
}

impl AuthFailure {
    /// Classify a backend error raised by `action`.
    pub fn classify(action: AuthAction, err: &BackendError) -> Self {
        let message = err.to_string();
        if is_blocked(err) {
            return AuthFailure::AccountDisabled;
        }
        match action {
            AuthAction::SignIn => {
                if message.contains("Invalid credentials") {
                    AuthFailure::InvalidCredentials
                } else if message.contains("Invalid email") {
                    AuthFailure::InvalidEmail
                } else {
                    AuthFailure::Unknown
                }
            }
            AuthAction::SignUp => {
                if message.contains("already exists") || err.code() == Some(409) {
                    AuthFailure::AccountExists
                } else if message.contains("Invalid email") {
                    AuthFailure::InvalidEmail
                } else if message.contains("password") {
                    AuthFailure::WeakPassword
                } else {
                    AuthFailure::Unknown
                }
            }
            AuthAction::PasswordRecovery => {
                if message.contains("expired") {
                    AuthFailure::ResetLinkExpired
                } else {
                    AuthFailure::ResetRequestFailed
                }
            }
            AuthAction::DeleteAccount => AuthFailure::DeleteFailed,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            AuthFailure::InvalidCredentials => "Invalid email or password",
            AuthFailure::InvalidEmail => "Please enter a valid email address",
            AuthFailure::AccountExists => "An account with this email already exists",
            AuthFailure::AccountDisabled => "This account has been disabled",
            AuthFailure::WeakPassword => "Password must be at least 8 characters",
            AuthFailure::ResetLinkExpired => "Reset link has expired. Please request a new one.",
            AuthFailure::ResetRequestFailed => "Failed to reset password. Please try again.",
            AuthFailure::DeleteFailed => "Failed to delete account. Please try again.",
            AuthFailure::Unknown => "Something went wrong. Please try again.",
        }
    }
}

fn is_blocked(err: &BackendError) -> bool {
    match err {
        BackendError::Api { kind, message, .. } => {
            kind == "user_blocked" || message.contains("has been blocked")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(code: u16, message: &str) -> BackendError {
        BackendError::Api {
            code,
            kind: "x".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_sign_in_invalid_credentials() {
        let err = api(401, "Invalid credentials. Please check the email and password.");
        let failure = AuthFailure::classify(AuthAction::SignIn, &err);
        assert_eq!(failure, AuthFailure::InvalidCredentials);
        assert_eq!(failure.user_message(), "Invalid email or password");
    }

    #[test]
    fn test_sign_up_conflict_by_code() {
        let err = api(409, "A user with the same id, email, or phone already exists");
        assert_eq!(
            AuthFailure::classify(AuthAction::SignUp, &err),
            AuthFailure::AccountExists
        );
        let err = api(409, "Conflict");
        assert_eq!(
            AuthFailure::classify(AuthAction::SignUp, &err),
            AuthFailure::AccountExists
        );
    }

    #[test]
    fn test_sign_up_password_rule() {
        let err = api(400, "Invalid `password` param: Password must be at least 8 characters");
        assert_eq!(
            AuthFailure::classify(AuthAction::SignUp, &err),
            AuthFailure::WeakPassword
        );
    }

    #[test]
    fn test_recovery_expired() {
        let err = api(401, "The recovery token has expired");
        let failure = AuthFailure::classify(AuthAction::PasswordRecovery, &err);
        assert_eq!(
            failure.user_message(),
            "Reset link has expired. Please request a new one."
        );
    }

    #[test]
    fn test_blocked_account_on_any_screen() {
        let err = BackendError::Api {
            code: 401,
            kind: "user_blocked".to_string(),
            message: "The current user has been blocked.".to_string(),
        };
        for action in [AuthAction::SignIn, AuthAction::PasswordRecovery] {
            assert_eq!(
                AuthFailure::classify(action, &err),
                AuthFailure::AccountDisabled
            );
        }
        assert_eq!(
            AuthFailure::AccountDisabled.user_message(),
            "This account has been disabled"
        );
    }

    #[test]
    fn test_transport_failures_are_unknown() {
        let err = BackendError::Http(crate::traits::HttpError::Timeout("30s".to_string()));
        assert_eq!(
            AuthFailure::classify(AuthAction::SignIn, &err).user_message(),
            "Something went wrong. Please try again."
        );
    }
}
