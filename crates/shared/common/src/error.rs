//! Unified application error handling.
//!
//! Domain failures are translated into an [`AppError`], which knows its
//! machine-readable code, an HTTP-equivalent status and a user-facing
//! message, and renders as a structured [`ErrorPayload`].

use domain::{DomainError, ErrorMetadata};
use serde::Serialize;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("{0}")]
    Unauthorized(String),

    // Resource errors
    #[error("{entity} with id {id} not found")]
    NotFound {
        entity: String,
        id: String,
        metadata: ErrorMetadata,
    },

    #[error("{message}")]
    Conflict { message: String, metadata: ErrorMetadata },

    // Validation
    #[error("{message}")]
    Validation { message: String, metadata: ErrorMetadata },

    #[error("{message}")]
    BusinessRule { message: String, metadata: ErrorMetadata },

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPayload {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "ErrorMetadata::is_empty")]
    pub metadata: ErrorMetadata,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::BusinessRule { .. } => "BUSINESS_RULE_VIOLATION",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Unauthorized(_) => 401,
            AppError::NotFound { .. } => 404,
            AppError::Conflict { .. } => 409,
            AppError::Validation { .. } => 400,
            AppError::BusinessRule { .. } => 422,
            _ => 500,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Client errors carry their own message
            _ => self.to_string(),
        }
    }

    /// Structured metadata for API translation; empty for internal errors.
    pub fn metadata(&self) -> ErrorMetadata {
        match self {
            AppError::NotFound { metadata, .. }
            | AppError::Conflict { metadata, .. }
            | AppError::Validation { metadata, .. }
            | AppError::BusinessRule { metadata, .. } => metadata.clone(),
            _ => ErrorMetadata::new(),
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
                metadata: self.metadata(),
            },
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message, metadata } => AppError::Validation { message, metadata },
            DomainError::NotFound { entity, id, metadata } => AppError::NotFound { entity, id, metadata },
            DomainError::Conflict { message, metadata } => AppError::Conflict { message, metadata },
            DomainError::Unauthorized { message, .. } => AppError::Unauthorized(message),
            DomainError::BusinessRule { message, metadata } => AppError::BusinessRule { message, metadata },
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &str, id: impl ToString) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str, id: impl ToString) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(entity, id))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        AppError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
            metadata: ErrorMetadata::new(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict {
            message: msg.into(),
            metadata: ErrorMetadata::new(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation {
            message: msg.into(),
            metadata: ErrorMetadata::new(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
