//! Field checks for the login request, run before any credential lookup.

use serde::Serialize;

use crate::domain::models::credential::Email;

pub const PASSWORD_MIN_CHARS: usize = 8;

/// One rejected field and the message shown to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Validate a login request.
///
/// Each field reports at most one message (the first rule it breaks); every
/// failing field is reported. On success the parsed [`Email`] is returned.
pub fn validate_login(email: &str, password: &str) -> Result<Email, Vec<FieldError>> {
    let mut errors = Vec::new();

    let parsed_email = if email.trim().is_empty() {
        errors.push(FieldError::new("email", "Email is Required."));
        None
    } else {
        match Email::new(email) {
            Ok(email) => Some(email),
            Err(_) => {
                errors.push(FieldError::new(
                    "email",
                    "Please Enter a Valid Email Address.",
                ));
                None
            }
        }
    };

    if password.trim().is_empty() {
        errors.push(FieldError::new("password", "Password is Required."));
    } else if password.chars().count() < PASSWORD_MIN_CHARS {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters Long.",
        ));
    }

    match parsed_email {
        Some(email) if errors.is_empty() => Ok(email),
        _ => Err(errors),
    }
}
