//! Ledger error types for validation, reference, constraint and storage errors.
//!
//! Every rejected operation leaves the ledger unchanged. Closing runs are the
//! only multi-entry operation and they are committed in a single database
//! transaction, so they follow the same rule.

use rust_decimal::Decimal;
use thiserror::Error;

use neraca_shared::AppError;

/// Broad classes of ledger failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed input: unbalanced entry, bad account code, missing field.
    Validation,
    /// A referenced account or entry does not exist.
    Referential,
    /// A uniqueness or deletion guard rejected the operation.
    Constraint,
    /// Connection, transaction or timeout failure.
    Storage,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry is not balanced (debits != credits beyond tolerance).
    #[error("Entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Entry has no lines with a non-zero amount.
    #[error("Entry must have at least one line with a non-zero amount")]
    NoLines,

    /// A line carries a negative debit or credit.
    #[error("Line amounts cannot be negative (account {account_code})")]
    NegativeAmount {
        /// Account code of the offending line.
        account_code: String,
    },

    /// Account code does not match the `<digits>-<digits>` pattern.
    #[error("Invalid account code format: '{0}' (expected e.g. 1-1000)")]
    InvalidCodeFormat(String),

    /// A required field is empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Unknown account type or normal balance name.
    #[error("Invalid value '{value}' for {field}")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: String,
    },

    /// Normal balance contradicts the account type.
    #[error("Account type {account_type} must have a {expected} normal balance")]
    InconsistentNormalBalance {
        /// Account type name.
        account_type: String,
        /// The normal balance the type requires.
        expected: String,
    },

    /// Period label does not match `YYYY-MM`.
    #[error("Invalid period label: '{0}' (expected YYYY-MM)")]
    InvalidPeriodLabel(String),

    // ========== Referential Errors ==========
    /// Account not found.
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// Journal entry not found in the owner scope.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(String),

    /// An account the closing procedure needs is missing.
    #[error("Closing account not found: {0}")]
    MissingClosingAccount(String),

    // ========== Constraint Errors ==========
    /// Account code already exists.
    #[error("Account code '{0}' already exists")]
    DuplicateAccountCode(String),

    /// Entry number already used within the owner scope.
    #[error("Entry number '{0}' already exists")]
    DuplicateEntryNumber(String),

    /// Account still has journal lines.
    #[error("Cannot delete account {code}: it has {lines} journal lines")]
    AccountHasTransactions {
        /// Account code.
        code: String,
        /// Number of referencing lines.
        lines: u64,
    },

    /// Account still carries a balance.
    #[error("Cannot delete account {code}: balance is {balance}")]
    AccountHasBalance {
        /// Account code.
        code: String,
        /// Computed balance.
        balance: Decimal,
    },

    /// Period was already closed for this owner.
    #[error("Period {0} has already been closed")]
    PeriodAlreadyClosed(String),

    // ========== Storage Errors ==========
    /// The call exceeded its time budget.
    #[error("Ledger operation timed out after {0} ms")]
    Timeout(u64),

    /// Connection or transaction failure.
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl LedgerError {
    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Unbalanced { .. }
            | Self::NoLines
            | Self::NegativeAmount { .. }
            | Self::InvalidCodeFormat(_)
            | Self::MissingField(_)
            | Self::InvalidValue { .. }
            | Self::InconsistentNormalBalance { .. }
            | Self::InvalidPeriodLabel(_) => ErrorCategory::Validation,

            Self::UnknownAccount(_) | Self::EntryNotFound(_) | Self::MissingClosingAccount(_) => {
                ErrorCategory::Referential
            }

            Self::DuplicateAccountCode(_)
            | Self::DuplicateEntryNumber(_)
            | Self::AccountHasTransactions { .. }
            | Self::AccountHasBalance { .. }
            | Self::PeriodAlreadyClosed(_) => ErrorCategory::Constraint,

            Self::Timeout(_) | Self::StorageFailure(_) => ErrorCategory::Storage,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unbalanced { .. } => "UNBALANCED",
            Self::NoLines => "NO_LINES",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::InvalidCodeFormat(_) => "INVALID_CODE_FORMAT",
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidValue { .. } => "INVALID_VALUE",
            Self::InconsistentNormalBalance { .. } => "INCONSISTENT_NORMAL_BALANCE",
            Self::InvalidPeriodLabel(_) => "INVALID_PERIOD_LABEL",
            Self::UnknownAccount(_) => "UNKNOWN_ACCOUNT",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::MissingClosingAccount(_) => "MISSING_CLOSING_ACCOUNT",
            Self::DuplicateAccountCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::DuplicateEntryNumber(_) => "DUPLICATE_ENTRY_NUMBER",
            Self::AccountHasTransactions { .. } => "ACCOUNT_HAS_TRANSACTIONS",
            Self::AccountHasBalance { .. } => "ACCOUNT_HAS_BALANCE",
            Self::PeriodAlreadyClosed(_) => "PERIOD_ALREADY_CLOSED",
            Self::Timeout(_) => "TIMEOUT",
            Self::StorageFailure(_) => "STORAGE_FAILURE",
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Only storage failures qualify. A failed `post` must still not be
    /// retried blindly by callers.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Storage)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err {
            LedgerError::Timeout(_) => Self::Timeout(message),
            LedgerError::AccountHasTransactions { .. }
            | LedgerError::AccountHasBalance { .. }
            | LedgerError::PeriodAlreadyClosed(_) => Self::BusinessRule(message),
            other => match other.category() {
                ErrorCategory::Validation => Self::Validation(message),
                ErrorCategory::Referential => Self::NotFound(message),
                ErrorCategory::Constraint => Self::Conflict(message),
                ErrorCategory::Storage => Self::Database(message),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            LedgerError::Unbalanced {
                debit: dec!(100),
                credit: dec!(50),
            }
            .category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            LedgerError::UnknownAccount("9-9999".into()).category(),
            ErrorCategory::Referential
        );
        assert_eq!(
            LedgerError::DuplicateEntryNumber("JU-1".into()).category(),
            ErrorCategory::Constraint
        );
        assert_eq!(
            LedgerError::StorageFailure("boom".into()).category(),
            ErrorCategory::Storage
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::NoLines.error_code(), "NO_LINES");
        assert_eq!(
            LedgerError::DuplicateEntryNumber("JU-1".into()).error_code(),
            "DUPLICATE_ENTRY_NUMBER"
        );
        assert_eq!(
            LedgerError::AccountHasTransactions {
                code: "1-1000".into(),
                lines: 3,
            }
            .error_code(),
            "ACCOUNT_HAS_TRANSACTIONS"
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(LedgerError::Timeout(5000).is_retryable());
        assert!(LedgerError::StorageFailure("reset".into()).is_retryable());
        assert!(!LedgerError::NoLines.is_retryable());
        assert!(!LedgerError::DuplicateEntryNumber("JU-1".into()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::Unbalanced {
            debit: dec!(100.00),
            credit: dec!(50.00),
        };
        assert_eq!(
            err.to_string(),
            "Entry is not balanced. Debit: 100.00, Credit: 50.00"
        );
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = LedgerError::UnknownAccount("9-9999".into()).into();
        assert_eq!(app.status_code(), 404);

        let app: AppError = LedgerError::DuplicateEntryNumber("JU-1".into()).into();
        assert_eq!(app.status_code(), 409);

        let app: AppError = LedgerError::PeriodAlreadyClosed("2026-01".into()).into();
        assert_eq!(app.status_code(), 422);

        let app: AppError = LedgerError::Timeout(10).into();
        assert_eq!(app.status_code(), 504);

        let app: AppError = LedgerError::NoLines.into();
        assert_eq!(app.status_code(), 400);

        let app: AppError = LedgerError::StorageFailure("reset".into()).into();
        assert!(matches!(app, AppError::Database(_)));
    }
}
