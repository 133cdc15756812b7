//! Financial report generation.
//!
//! Pure builders over derived account balances:
//! - Trial Balance (unadjusted, adjusted and post-closing)
//! - Income Statement
//! - Balance Sheet
//! - Statement of Changes in Equity
//! - Account Ledger with running balance

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::{EquityAccounts, ReportService};
pub use types::*;
