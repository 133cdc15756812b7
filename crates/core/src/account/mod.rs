//! Chart of accounts.
//!
//! Account codes, account types and the normal-balance convention, plus the
//! rules the registry applies before creating or deleting an account.

mod chart;
mod rules;
mod types;

pub use chart::default_chart;
pub use rules::AccountRules;
pub use types::{Account, AccountCode, AccountType, NewAccount, NormalBalance};
