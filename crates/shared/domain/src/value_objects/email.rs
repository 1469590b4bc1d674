//! Email address value object.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Normalized (trimmed, lowercase) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validate and normalize a raw address.
    ///
    /// # Errors
    /// Returns a validation error when the address is empty or does not
    /// match `local@domain.tld`.
    pub fn create(raw: &str) -> DomainResult<Self> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(DomainError::validation("Email is required").with_meta("field", "email"));
        }

        if !EMAIL_PATTERN.is_match(&normalized) {
            return Err(DomainError::validation(format!("Invalid email format: {}", raw.trim()))
                .with_meta("field", "email"));
        }

        Ok(Self(normalized))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// Part before the `@`
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }

    /// Part after the `@`
    pub fn domain(&self) -> &str {
        self.0.split('@').nth(1).unwrap_or_default()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_valid_emails_round_trip() {
        let samples = [
            "ana@example.com",
            "first.last@clinic.co.uk",
            "dietitian+notes@nutri.io",
        ];

        for sample in samples {
            let email = Email::create(sample).unwrap();
            assert_eq!(email.value(), sample);
        }
    }

    #[test]
    fn test_email_is_normalized() {
        let email = Email::create("  Ana.Lopez@Example.COM ").unwrap();
        assert_eq!(email.value(), "ana.lopez@example.com");
        assert_eq!(email.local_part(), "ana.lopez");
        assert_eq!(email.domain(), "example.com");
    }

    #[test]
    fn test_invalid_emails_rejected() {
        let samples = ["", "   ", "no-at-sign", "two@@example.com", "a@b@c.com", "user@nodot", "@example.com", "user@.", "us er@example.com"];

        for sample in samples {
            let err = Email::create(sample).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{sample} should be rejected");
        }
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let email = Email::create("ana@example.com").unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"ana@example.com\"");
    }
}
