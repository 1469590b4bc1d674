//! Common utilities shared across practice services.
//!
//! This crate provides:
//! - Application error handling with structured API payloads
//! - Configuration structures
//! - Pagination types
//! - Translation of specification filters into SQL (`database` feature)

pub mod config;
pub mod error;
pub mod pagination;
#[cfg(feature = "database")]
pub mod query;

pub use config::*;
pub use error::{AppError, AppResult, ErrorBody, ErrorPayload, OptionExt};
pub use pagination::{Paginated, PaginationMeta, PaginationParams};
