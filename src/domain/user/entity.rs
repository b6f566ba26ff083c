//! User entity and related types

use serde::{Deserialize, Serialize};

use super::validation::{validate_email, UserValidationError};
use crate::domain::storage::{StorageEntity, StorageKey};

/// Email address identifying a user - the primary key of the users collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Create a new Email after validation
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into().trim().to_string();
        validate_email(&email)?;
        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for Email {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// User account
///
/// `password` only ever holds a salted hash. It is omitted from the serialized
/// form when empty, which is what [`User::redacted`] relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    name: String,
    email: Email,
    username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    password: String,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: Email,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email,
            username: username.into(),
            password: password_hash.into(),
        }
    }

    // Getters

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password
    }

    // Mutators

    /// Replace the stored hash
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password = password_hash.into();
    }

    /// Copy of the user with the credential cleared, safe to expose
    pub fn redacted(&self) -> Self {
        Self {
            password: String::new(),
            ..self.clone()
        }
    }
}

impl StorageEntity for User {
    type Key = Email;

    fn key(&self) -> &Self::Key {
        &self.email
    }
}
