//! Shared types, errors, and configuration for Neraca.
//!
//! This crate provides common types used across all other crates:
//! - Money helpers with two-digit decimal precision and tolerance checks
//! - Typed IDs for type-safe entity references
//! - The boundary error type ledger failures convert into
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, LedgerConfig};
pub use error::{AppError, AppResult};
