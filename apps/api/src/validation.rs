//! Boundary validation shared by the auth, hunter, and résumé handlers.
//!
//! Every validator collects all failures into a `FieldErrors` and only then
//! rejects, so clients see every offending field in one response.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{AppError, FieldError};

/// Dot-atom local part, then two or more hostname labels ending in an
/// alphabetic TLD of any length.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
    )
    .expect("email pattern compiles")
});

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const PASSWORD_MIN_CHARS: usize = 6;

#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(value)` if nothing was recorded, otherwise every recorded failure.
    pub fn finish<T>(self, value: T) -> Result<T, AppError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Emails are stored trimmed and lowercased; lookups use the same form.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn char_len_between(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

/// Trims and checks a display name, recording a failure under `field`.
pub fn check_name(errors: &mut FieldErrors, field: &str, raw: &str) -> String {
    let name = raw.trim().to_string();
    if !char_len_between(&name, NAME_MIN_CHARS, NAME_MAX_CHARS) {
        errors.push(
            field,
            format!("Hunter name must be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters"),
        );
    }
    name
}

/// Normalizes and checks an email, recording a failure under `field`.
pub fn check_email(errors: &mut FieldErrors, field: &str, raw: &str) -> String {
    let email = normalize_email(raw);
    if !is_valid_email(&email) {
        errors.push(field, "Please provide a valid email");
    }
    email
}
