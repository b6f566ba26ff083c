//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Name, Email, Username and Password are required.")]
    MissingRequiredFields,

    #[error("Invalid email address.")]
    InvalidEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("Username contains invalid character: '{0}'. Whitespace is not allowed")]
    InvalidUsernameCharacter(char),
}

const MAX_EMAIL_LENGTH: usize = 254;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Check that every field a signup needs is present
pub fn validate_required_fields(
    name: &str,
    email: &str,
    username: &str,
    password: &str,
) -> Result<(), UserValidationError> {
    if [name, email, username, password]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(UserValidationError::MissingRequiredFields);
    }

    Ok(())
}

/// Validate an email address
///
/// Only the `local@domain.tld` shape is checked.
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !EMAIL_PATTERN.is_match(email) {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a username
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if let Some(c) = username.chars().find(|c| c.is_whitespace()) {
        return Err(UserValidationError::InvalidUsernameCharacter(c));
    }

    Ok(())
}
