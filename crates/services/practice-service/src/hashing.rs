//! Password hashing service.
//!
//! The domain only stores hashes (`Password::from_hash`); producing and
//! verifying them happens here with Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Argon2,
};

use common::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, plain_text: &str) -> AppResult<String>;

    /// Verify a plain text password against a stored hash.
    fn verify(&self, plain_text: &str, hash: &str) -> AppResult<bool>;
}

/// Argon2id with default parameters and a random salt per hash.
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("SecurePass123").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("SecurePass123", &hash).unwrap());
        assert!(!hasher.verify("WrongPass123", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let hasher = Argon2Hasher::new();
        let first = hasher.hash("SecurePass123").unwrap();
        let second = hasher.hash("SecurePass123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_is_internal_error() {
        let err = Argon2Hasher::new().verify("SecurePass123", "not-a-hash").unwrap_err();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }
}
