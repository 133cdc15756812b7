//! Database migration runner for the Neraca ledger.
//!
//! Usage:
//!   migrator up      - Run all pending migrations
//!   migrator down    - Rollback last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!
//! The target database is read from `DATABASE_URL`.

use neraca_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The migrator CLI sets up its own tracing.
    cli::run_cli(Migrator).await;
}
