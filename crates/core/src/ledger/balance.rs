//! Account balance derivation.
//!
//! Balances are never stored. They are recomputed from journal lines on
//! every read using the normal-balance rule:
//! - Debit-normal (Asset, Expense): balance = debits - credits
//! - Credit-normal (Liability, Equity, Revenue): balance = credits - debits

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::{Account, AccountType, NormalBalance};

/// Derived balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Normal balance side.
    pub normal_balance: NormalBalance,
    /// Sum of debit amounts.
    pub debit_total: Decimal,
    /// Sum of credit amounts.
    pub credit_total: Decimal,
    /// Signed balance following the normal-balance rule.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Derives the balance of `account` from its line totals.
    #[must_use]
    pub fn from_totals(account: &Account, debit_total: Decimal, credit_total: Decimal) -> Self {
        Self {
            code: account.code.to_string(),
            name: account.name.clone(),
            account_type: account.account_type,
            normal_balance: account.normal_balance,
            debit_total,
            credit_total,
            balance: account.normal_balance.signed(debit_total, credit_total),
        }
    }

    /// Returns the row this balance occupies in a trial balance.
    #[must_use]
    pub fn trial_balance_row(&self) -> TrialBalanceRow {
        let (debit, credit) = trial_balance_columns(self.normal_balance, self.balance);
        TrialBalanceRow {
            code: self.code.clone(),
            name: self.name.clone(),
            account_type: self.account_type,
            debit,
            credit,
        }
    }
}

/// One trial-balance line with the balance placed in a display column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Debit column (non-negative).
    pub debit: Decimal,
    /// Credit column (non-negative).
    pub credit: Decimal,
}

/// Places a signed balance in the debit or credit column.
///
/// A debit-normal account shows a positive balance as a debit and a negative
/// one as a credit of the absolute value. Credit-normal accounts mirror this.
#[must_use]
pub fn trial_balance_columns(
    normal_balance: NormalBalance,
    balance: Decimal) -> (Decimal, Decimal,
) {
    let on_normal_side = balance >= Decimal::ZERO;
    match (normal_balance, on_normal_side) {
        (NormalBalance::Debit, true) => (balance, Decimal::ZERO),
        (NormalBalance::Debit, false) => (Decimal::ZERO, balance.abs()),
        (NormalBalance::Credit, true) => (Decimal::ZERO, balance),
        (NormalBalance::Credit, false) => (balance.abs(), Decimal::ZERO),
    }
}

/// Running balance after one line in an account ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// Number of lines applied so far.
    pub line_count: u64,
    /// Balance before this line.
    pub previous_balance: Decimal,
    /// Balance after this line.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Balance of an account with no lines.
    #[must_use]
    pub const fn opening() -> Self {
        Self {
            line_count: 0,
            previous_balance: Decimal::ZERO,
            current_balance: Decimal::ZERO,
        }
    }

    /// Applies one line under the given normal balance.
    #[must_use]
    pub fn apply(&self, normal_balance: NormalBalance, debit: Decimal, credit: Decimal) -> Self {
        Self {
            line_count: self.line_count + 1,
            previous_balance: self.current_balance,
            current_balance: self.current_balance + normal_balance.signed(debit, credit),
        }
    }
}
