//! Double-entry posting rules and balance derivation.
//!
//! - `types`: candidate, validated and committed journal entries
//! - `validation`: the rules every posting passes through
//! - `balance`: normal-balance derivation and trial-balance columns
//! - `cache`: optional read-through balance cache
//! - `error`: the ledger error taxonomy

pub mod balance;
pub mod cache;
pub mod error;
pub mod types;
pub mod validation;

pub use balance::{AccountBalance, RunningBalance, TrialBalanceRow, trial_balance_columns};
pub use cache::BalanceCache;
pub use error::{ErrorCategory, LedgerError};
pub use types::{
    CandidateEntry, EntryKind, EntryTotals, JournalEntry, JournalFilter, JournalLine,
    JournalLineInput, ValidatedEntry, ValidatedLine,
};
pub use validation::PostingRules;
