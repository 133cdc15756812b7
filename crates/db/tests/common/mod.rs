//! Shared setup for ledger integration tests.
//!
//! Every test gets its own in-memory SQLite database. The pool is capped at a
//! single connection because each SQLite memory connection is a separate
//! database.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use neraca_core::ledger::CandidateEntry;
use neraca_db::migration::Migrator;
use neraca_db::Ledger;
use neraca_shared::LedgerConfig;
use neraca_shared::types::OwnerId;

pub const CASH: &str = "1-1000";
pub const BANK: &str = "1-1100";
pub const CAPITAL: &str = "3-3000";
pub const RETAINED_EARNINGS: &str = "3-3100";
pub const INCOME_SUMMARY: &str = "3-3200";
pub const DRAWINGS: &str = "3-3300";
pub const SERVICE_REVENUE: &str = "4-4000";
pub const SALARY_EXPENSE: &str = "5-5000";
pub const RENT_EXPENSE: &str = "5-5100";

pub async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// A migrated, seeded ledger with the given configuration.
pub async fn ledger_with(config: LedgerConfig) -> Ledger {
    let ledger = Ledger::new(memory_db().await, config).expect("Invalid ledger config");
    let seeded = ledger
        .seed_default_accounts()
        .await
        .expect("Failed to seed chart of accounts");
    assert_eq!(seeded, 16);
    ledger
}

pub async fn ledger() -> Ledger {
    ledger_with(LedgerConfig::default()).await
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Two-line entry: debit one account, credit another.
pub fn simple_entry(
    owner: OwnerId,
    entry_no: &str,
    on: NaiveDate,
    debit_code: &str,
    credit_code: &str,
    amount: Decimal,
) -> CandidateEntry {
    CandidateEntry::new(owner, entry_no, on, format!("Entry {entry_no}"))
        .debit(debit_code, amount)
        .credit(credit_code, amount)
}
