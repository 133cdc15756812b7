//! Core business logic for Neraca.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `account` - Chart of accounts rules (codes, types, normal balances)
//! - `ledger` - Double-entry posting rules and balance derivation
//! - `reports` - Trial balance, income statement, balance sheet, ledger views
//! - `closing` - Period-closing plan synthesis and verification

pub mod account;
pub mod closing;
pub mod ledger;
pub mod reports;
