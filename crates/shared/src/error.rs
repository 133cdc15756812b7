//! Boundary error type for callers outside the ledger crates.
//!
//! `LedgerError` converts into `AppError`, which groups ledger failures into
//! the handful of outcomes a caller reacts to differently.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Ledger failure as seen by a caller.
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced account or entry does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before anything was written.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Request is well-formed but the ledger's state forbids it.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// A unique key is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage call exceeded its time budget. Safe to retry.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Storage failed. Safe to retry.
    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// HTTP-style status for callers that expose the ledger over a wire protocol.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule(_) => 422,
            Self::Conflict(_) => 409,
            Self::Timeout(_) => 504,
            Self::Database(_) => 500,
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Timeout(_) => "TIMEOUT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
