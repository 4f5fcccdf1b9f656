// Form validation shared by the auth and profile actions.
// Errors are collected per field and handed back to the form, never thrown.

use serde::Serialize;
use std::collections::BTreeMap;

pub const MIN_PASSWORD_LEN: usize = 8;

const INVALID_EMAIL: &str = "Please enter a valid email address";
const SHORT_PASSWORD: &str = "Password must be at least 8 characters long";

pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

/// Outcome of a form action, rendered back into the page that submitted it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActionResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: FieldErrors,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: FieldErrors::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: FieldErrors::new(),
        }
    }

    pub fn invalid(errors: FieldErrors) -> Self {
        Self {
            success: false,
            message: "Validation failed".to_string(),
            errors,
        }
    }

    pub fn field_errors(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn push(errors: &mut FieldErrors, field: &'static str, message: &str) {
    errors.entry(field).or_default().push(message.to_string());
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() || !email.contains('@') {
        push(errors, "email", INVALID_EMAIL);
    }
}

fn finish(errors: FieldErrors) -> Result<(), ActionResult> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ActionResult::invalid(errors))
    }
}

pub fn validate_sign_up(email: &str, password: &str) -> Result<(), ActionResult> {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, email);
    if password.chars().count() < MIN_PASSWORD_LEN {
        push(&mut errors, "password", SHORT_PASSWORD);
    }
    finish(errors)
}

pub fn validate_sign_in(email: &str, password: &str) -> Result<(), ActionResult> {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, email);
    if password.is_empty() {
        push(&mut errors, "password", "Password is required");
    }
    finish(errors)
}

pub fn validate_forgot_password(email: &str) -> Result<(), ActionResult> {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, email);
    finish(errors).map_err(|mut result| {
        result.message = INVALID_EMAIL.to_string();
        result
    })
}

pub fn validate_confirm_password(email: &str, code: &str, new_password: &str) -> Result<(), ActionResult> {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, email);
    if code.is_empty() {
        push(&mut errors, "code", "Verification code is required");
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        push(&mut errors, "newPassword", SHORT_PASSWORD);
    }
    finish(errors)
}

/// Only same-site absolute paths are accepted as post-sign-in targets.
///
/// Browsers drop tabs and newlines from URLs, so any whitespace or control
/// character disqualifies the target outright.
pub fn safe_redirect_target(target: Option<&str>) -> Option<&str> {
    target.filter(|t| {
        t.starts_with('/')
            && !t.starts_with("//")
            && !t.starts_with("/\\")
            && !t.chars().any(|c| c.is_control() || c.is_whitespace())
    })
}
