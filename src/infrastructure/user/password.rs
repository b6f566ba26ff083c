//! Salted one-way password hashing

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Hashes credentials before they reach storage
pub trait PasswordHasher: Send + Sync + Debug {
    /// Produce a salted PHC string for `password`
    ///
    /// Fails only when the hasher itself cannot run, which is fatal.
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Check `password` against a stored hash; malformed hashes never verify
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2-based password hasher
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    /// Create a new Argon2 hasher
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_original_only() {
        let hasher = Argon2Hasher::new();

        let hash = hasher.hash("123456").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, "123456");
        assert!(hasher.verify("123456", &hash));
        assert!(!hasher.verify("1234567", &hash));
    }

    #[test]
    fn test_same_password_gets_fresh_salt() {
        let hasher = Argon2Hasher::new();

        let first = hasher.hash("secret").unwrap();
        let second = hasher.hash("secret").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("secret", &first));
        assert!(hasher.verify("secret", &second));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let hasher = Argon2Hasher::new();

        assert!(!hasher.verify("secret", "secret"));
        assert!(!hasher.verify("secret", ""));
    }
}
