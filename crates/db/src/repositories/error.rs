//! `DbErr` to `LedgerError` conversion at the repository boundary.

use sea_orm::{DbErr, SqlErr};
use tracing::error;

use neraca_core::ledger::LedgerError;

/// Maps a database failure to `StorageFailure`.
pub(crate) fn storage_failure(err: DbErr) -> LedgerError {
    error!(error = %err, "Ledger storage failure");
    LedgerError::StorageFailure(err.to_string())
}

/// Maps a unique-constraint violation to `conflict`, anything else to `StorageFailure`.
pub(crate) fn unique_violation_or_storage(
    err: DbErr,
    conflict: impl FnOnce() -> LedgerError,
) -> LedgerError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => conflict(),
        _ => storage_failure(err),
    }
}
