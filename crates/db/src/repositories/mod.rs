//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every repository speaks `LedgerError`; `DbErr` never leaves this module.

pub mod account;
pub mod balance;
pub mod closing;
mod error;
pub mod journal;

pub use account::AccountRepository;
pub use balance::BalanceRepository;
pub use closing::{ClosingOutcome, ClosingRepository};
pub use journal::{JournalPage, JournalRepository, PostedEntry};
