//! Client-side checks for the auth forms.
//!
//! Each form reports every failing field at once so the screen can show
//! the messages next to their inputs.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

/// Loose email shape check: something@something.something
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("Invalid email regex"));

pub const MIN_NICKNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 8;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Not tied to an input; shown above the form.
    General,
    Email,
    Nickname,
    Password,
    ConfirmPassword,
}

/// Field -> message map for a failed form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, &'static str>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message for a field wins.
    pub fn add(&mut self, field: Field, message: &'static str) {
        self.errors.entry(field).or_insert(message);
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, *message))
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.values().copied().collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn check_new_password(
    errors: &mut ValidationErrors,
    password: &str,
    confirm: &str,
    missing_confirm: Option<&'static str>,
) {
    if password.is_empty() {
        errors.add(Field::Password, "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(Field::Password, "Password must be at least 8 characters");
    }

    match missing_confirm {
        Some(message) if confirm.is_empty() => errors.add(Field::ConfirmPassword, message),
        _ if password != confirm => errors.add(Field::ConfirmPassword, "Passwords do not match"),
        _ => {}
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub email: String,
    pub nickname: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.email.is_empty() {
            errors.add(Field::Email, "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.add(Field::Email, "Email is invalid");
        }

        if self.nickname.is_empty() {
            errors.add(Field::Nickname, "Nickname is required");
        } else if self.nickname.chars().count() < MIN_NICKNAME_LEN {
            errors.add(Field::Nickname, "Nickname must be at least 3 characters");
        }

        check_new_password(
            &mut errors,
            &self.password,
            &self.confirm_password,
            Some("Please confirm your password"),
        );

        errors.into_result()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.email.is_empty() || self.password.is_empty() {
            errors.add(Field::General, "Please fill in all fields");
        }
        errors.into_result()
    }
}

/// First step of password recovery.
#[derive(Debug, Clone, Default)]
pub struct ResetRequestForm {
    pub email: String,
}

impl ResetRequestForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.email.is_empty() {
            errors.add(Field::Email, "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.add(Field::Email, "Please enter a valid email");
        }
        errors.into_result()
    }
}

/// Second step of password recovery, opened from the email link.
#[derive(Debug, Clone, Default)]
pub struct NewPasswordForm {
    pub password: String,
    pub confirm_password: String,
}

impl NewPasswordForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_new_password(&mut errors, &self.password, &self.confirm_password, None);
        errors.into_result()
    }
}
