//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, gRPC, database).

use std::collections::BTreeMap;

use thiserror::Error;

/// Structured context attached to an error for API translation.
pub type ErrorMetadata = BTreeMap<String, String>;

/// Domain-specific errors for expected, caller-recoverable failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Malformed or out-of-range input
    #[error("{message}")]
    Validation {
        message: String,
        metadata: ErrorMetadata,
    },

    /// Missing aggregate
    #[error("{entity} with id {id} not found")]
    NotFound {
        entity: String,
        id: String,
        metadata: ErrorMetadata,
    },

    /// Uniqueness violation
    #[error("{message}")]
    Conflict {
        message: String,
        metadata: ErrorMetadata,
    },

    /// Reserved for the authentication boundary
    #[error("{message}")]
    Unauthorized {
        message: String,
        metadata: ErrorMetadata,
    },

    /// Illegal state transition or invariant violation
    #[error("{message}")]
    BusinessRule {
        message: String,
        metadata: ErrorMetadata,
    },
}

/// Discriminant of [`DomainError`], useful for matching without payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    BusinessRule,
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation {
            message: msg.into(),
            metadata: ErrorMetadata::new(),
        }
    }

    /// Create a not found error for an entity name and id
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
            metadata: ErrorMetadata::new(),
        }
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict {
            message: msg.into(),
            metadata: ErrorMetadata::new(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        DomainError::Unauthorized {
            message: msg.into(),
            metadata: ErrorMetadata::new(),
        }
    }

    /// Create a business rule error
    pub fn business_rule(msg: impl Into<String>) -> Self {
        DomainError::BusinessRule {
            message: msg.into(),
            metadata: ErrorMetadata::new(),
        }
    }

    /// Attach a metadata entry, returning the error for chaining.
    pub fn with_meta(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata_mut().insert(key.into(), value.to_string());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation { .. } => ErrorKind::Validation,
            DomainError::NotFound { .. } => ErrorKind::NotFound,
            DomainError::Conflict { .. } => ErrorKind::Conflict,
            DomainError::Unauthorized { .. } => ErrorKind::Unauthorized,
            DomainError::BusinessRule { .. } => ErrorKind::BusinessRule,
        }
    }

    /// Human-readable message (same as `Display`)
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn metadata(&self) -> &ErrorMetadata {
        match self {
            DomainError::Validation { metadata, .. }
            | DomainError::NotFound { metadata, .. }
            | DomainError::Conflict { metadata, .. }
            | DomainError::Unauthorized { metadata, .. }
            | DomainError::BusinessRule { metadata, .. } => metadata,
        }
    }

    fn metadata_mut(&mut self) -> &mut ErrorMetadata {
        match self {
            DomainError::Validation { metadata, .. }
            | DomainError::NotFound { metadata, .. }
            | DomainError::Conflict { metadata, .. }
            | DomainError::Unauthorized { metadata, .. }
            | DomainError::BusinessRule { metadata, .. } => metadata,
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Consumption helpers on top of [`DomainResult`].
pub trait DomainResultExt<T> {
    /// Collapse both branches into a single value.
    fn fold<U>(self, on_success: impl FnOnce(T) -> U, on_failure: impl FnOnce(DomainError) -> U) -> U;

    /// True when the failure is of the given kind.
    fn is_failure_of(&self, kind: ErrorKind) -> bool;
}

impl<T> DomainResultExt<T> for DomainResult<T> {
    fn fold<U>(self, on_success: impl FnOnce(T) -> U, on_failure: impl FnOnce(DomainError) -> U) -> U {
        match self {
            Ok(value) => on_success(value),
            Err(error) => on_failure(error),
        }
    }

    fn is_failure_of(&self, kind: ErrorKind) -> bool {
        matches!(self, Err(e) if e.kind() == kind)
    }
}

/// Fail with `error` unless `condition` holds.
pub fn ensure(condition: bool, error: impl FnOnce() -> DomainError) -> DomainResult<()> {
    if condition {
        Ok(())
    } else {
        Err(error())
    }
}

/// Trimmed, non-empty text or a validation error naming the field.
pub(crate) fn required_text(value: &str, field: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    ensure(!trimmed.is_empty(), || {
        DomainError::validation(format!("{} is required", field)).with_meta("field", field)
    })?;
    Ok(trimmed.to_string())
}

/// Trim optional text, mapping blank input to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
