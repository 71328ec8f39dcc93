//! Password hashing - one-way credential transform.
//!
//! The hash is an opaque PHC string. It is stored in place of the
//! plaintext and never logged or returned to clients.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};

use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Opaque credential hash.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl HashedPassword {
    /// Wrap an existing hash (from the database or a hasher).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }
}

/// One-way credential transform.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, plain_text: &str) -> AppResult<HashedPassword>;
}

/// Argon2id hasher with a fresh random salt per call.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Verify a plain text password against a stored hash.
    ///
    /// Malformed hashes never verify.
    pub fn verify(&self, plain_text: &str, hashed: &HashedPassword) -> bool {
        match PasswordHash::new(hashed.as_str()) {
            Ok(parsed) => Self::argon2()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Invalid hash format: {}", e);
                false
            }
        }
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain_text: &str) -> AppResult<HashedPassword> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(HashedPassword::from_hash(hash.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2PasswordHasher::new();
        let hashed = hasher.hash("password123").unwrap();

        assert_ne!(hashed.as_str(), "password123");
        assert!(hashed.as_str().starts_with("$argon2"));
        assert!(hasher.verify("password123", &hashed));
        assert!(!hasher.verify("password124", &hashed));
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash("password123").unwrap();
        let second = hasher.hash("password123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("password123", &first));
        assert!(hasher.verify("password123", &second));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let hasher = Argon2PasswordHasher::new();
        let bogus = HashedPassword::from_hash("not-a-phc-string".to_string());
        assert!(!hasher.verify("anything", &bogus));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let hashed = HashedPassword::from_hash("$argon2id$secret".to_string());
        let debug = format!("{:?}", hashed);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
