//! Password value object.
//!
//! Two construction paths that must never be confused:
//! - [`Password::create`] validates a plaintext candidate
//! - [`Password::from_hash`] wraps an already-hashed value without validation
//!
//! Hashing and verification live in the infrastructure layer.

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::error::{DomainError, DomainResult};

#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    value: String,
    hashed: bool,
}

// Don't expose the value in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("value", &"[REDACTED]")
            .field("hashed", &self.hashed)
            .finish()
    }
}

impl Password {
    /// Validate a plaintext password.
    ///
    /// Requires at least [`MIN_PASSWORD_LENGTH`] characters with one
    /// uppercase letter, one lowercase letter and one digit.
    pub fn create(plain_text: &str) -> DomainResult<Self> {
        let mut problems = Vec::new();

        if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
            problems.push(format!("at least {} characters", MIN_PASSWORD_LENGTH));
        }
        if !plain_text.chars().any(|c| c.is_uppercase()) {
            problems.push("one uppercase letter".to_string());
        }
        if !plain_text.chars().any(|c| c.is_lowercase()) {
            problems.push("one lowercase letter".to_string());
        }
        if !plain_text.chars().any(|c| c.is_ascii_digit()) {
            problems.push("one digit".to_string());
        }

        if !problems.is_empty() {
            return Err(DomainError::validation(format!(
                "Password must contain {}",
                problems.join(", ")
            ))
            .with_meta("field", "password"));
        }

        Ok(Self {
            value: plain_text.to_string(),
            hashed: false,
        })
    }

    /// Wrap a stored hash. Never validated, never re-hashed.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self {
            value: hash.into(),
            hashed: true,
        }
    }

    /// True when built through [`Password::from_hash`].
    pub fn is_hashed(&self) -> bool {
        self.hashed
    }

    /// Plaintext or hash, depending on the construction path.
    pub fn value(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_strong_password_accepted() {
        for candidate in ["Password1", "S3curePass", "abcDEF123", "ÄbcdefG9"] {
            let password = Password::create(candidate).unwrap();
            assert!(!password.is_hashed());
            assert_eq!(password.value(), candidate);
        }
    }

    #[test]
    fn test_each_missing_rule_rejected() {
        let weak = [
            "Short1A",     // length
            "password123", // uppercase
            "PASSWORD123", // lowercase
            "PasswordAbc", // digit
            "",
        ];

        for candidate in weak {
            let err = Password::create(candidate).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{candidate:?} should fail");
        }
    }

    #[test]
    fn test_message_lists_problems() {
        let err = Password::create("abc").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("at least 8 characters"));
        assert!(message.contains("one uppercase letter"));
        assert!(message.contains("one digit"));
        assert!(!message.contains("lowercase"));
    }

    #[test]
    fn test_from_hash_skips_validation() {
        let password = Password::from_hash("$argon2id$v=19$short");
        assert!(password.is_hashed());
        assert_eq!(password.value(), "$argon2id$v=19$short");

        let weak_hash = Password::from_hash("x");
        assert!(weak_hash.is_hashed());
    }

    #[test]
    fn test_debug_redacts_value() {
        let password = Password::create("Password1").unwrap();
        let debug = format!("{:?}", password);
        assert!(!debug.contains("Password1"));
        assert!(debug.contains("REDACTED"));
    }
}
