//! Period closing.
//!
//! Closing zeroes the temporary (revenue and expense) accounts into retained
//! earnings through an income-summary clearing account:
//!
//! ```text
//! Start -> ComputeTemporaryBalances
//!       -> CloseRevenue        (if total revenue != 0)
//!       -> CloseExpenses       (if total expense != 0)
//!       -> CloseIncomeSummary  (if net income != 0)
//!       -> VerifyZeroed -> Done
//! ```
//!
//! This module only plans and verifies. Persisting the plan is the storage
//! layer's job, and it writes every planned entry in one transaction.

mod period;
mod plan;
mod verify;

pub use period::PeriodLabel;
pub use plan::{ClosingAccounts, ClosingPlan, ClosingPlanner, ClosingStep, PlannedEntry};
pub use verify::{ClosingReport, ClosingVerifier, ClosingWarning};
