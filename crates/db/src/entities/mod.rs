//! `SeaORM` entities for the ledger tables.

pub mod prelude;

pub mod accounts;
pub mod closing_runs;
pub mod journal_details;
pub mod journals;
pub mod sea_orm_active_enums;
