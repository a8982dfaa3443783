//! Error types.
//!
//! The store taxonomy mirrors what the remote providers can actually
//! signal: authorization failures and constraint violations are terminal,
//! while transient provider failures are safe to retry because the upsert
//! protocol is idempotent. "Not found" and "already exists" are modeled as
//! outcomes, not errors (see `core::store`).

use thiserror::Error;

/// Errors reported by a record store backend.
///
/// Every variant carries the provider's original diagnostic text.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The provider rejected the caller's credentials or permissions.
    /// Never retried.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// The name or value violates the store's constraints. Never retried.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// Network or provider-side failure, including call timeouts.
    /// The whole operation may be retried by the caller.
    #[error("store unavailable: {0}")]
    TransientUnavailable(String),
}

impl StoreError {
    /// Whether the caller may safely retry the whole operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::TransientUnavailable(_))
    }
}

/// Errors from local pre-flight validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("record name cannot be empty")]
    EmptyName,

    #[error("secret {0} requires a non-empty value")]
    EmptyValue(String),

    #[error("tag {0} redefines a reserved provenance key")]
    ReservedTag(String),

    #[error("invalid tag '{0}': expected KEY=VALUE")]
    MalformedTag(String),
}

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
