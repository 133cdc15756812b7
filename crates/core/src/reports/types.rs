//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::account::NormalBalance;
use crate::ledger::{AccountBalance, TrialBalanceRow};

/// Which trial balance a report represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialBalanceKind {
    /// Before adjusting entries are reviewed.
    Unadjusted,
    /// After adjusting entries are posted.
    Adjusted,
    /// After closing: permanent accounts only.
    PostClosing,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Report kind.
    pub kind: TrialBalanceKind,
    /// One row per account, ordered by code.
    pub rows: Vec<TrialBalanceRow>,
    /// Column totals.
    pub totals: TrialBalanceTotals,
}

/// Trial balance totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Sum of the debit column.
    pub total_debit: Decimal,
    /// Sum of the credit column.
    pub total_credit: Decimal,
    /// Whether the columns agree within tolerance.
    pub is_balanced: bool,
}

/// Post-closing trial balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostClosingTrialBalance {
    /// Trial balance over permanent accounts.
    pub trial_balance: TrialBalanceReport,
    /// Temporary accounts still carrying a balance beyond tolerance.
    pub unclosed_accounts: Vec<AccountBalance>,
}

impl PostClosingTrialBalance {
    /// True once every temporary account is zero within tolerance.
    #[must_use]
    pub fn is_fully_closed(&self) -> bool {
        self.unclosed_accounts.is_empty()
    }
}

/// A group of accounts with a total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section total (sum of signed balances).
    pub total: Decimal,
    /// Accounts with a non-zero balance, ordered by code.
    pub accounts: Vec<AccountBalance>,
}

/// Income statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Revenue accounts.
    pub revenue: ReportSection,
    /// Expense accounts.
    pub expenses: ReportSection,
    /// Revenue minus expenses. Negative for a loss.
    pub net_income: Decimal,
}

/// Balance sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Asset accounts.
    pub assets: ReportSection,
    /// Liability accounts.
    pub liabilities: ReportSection,
    /// Equity accounts.
    pub equity: ReportSection,
    /// Net income of temporary accounts not yet closed.
    pub current_net_income: Decimal,
    /// Liabilities + equity + current net income.
    pub total_liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities and equity within tolerance.
    pub is_balanced: bool,
}

/// Statement of changes in equity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityStatementReport {
    /// Owner's capital account balance.
    pub capital: Decimal,
    /// Retained earnings balance (closed net income of prior runs).
    pub retained_earnings: Decimal,
    /// Current unclosed net income.
    pub net_income: Decimal,
    /// Owner withdrawals, as a positive amount.
    pub withdrawals: Decimal,
    /// Capital + retained earnings + net income - withdrawals.
    pub ending_equity: Decimal,
}

/// A journal line of one account, as read for the account ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerPosting {
    /// Entry date.
    pub date: NaiveDate,
    /// Entry number.
    pub entry_no: String,
    /// Entry description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// One account ledger line with its running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLedgerLine {
    /// The underlying posting.
    #[serde(flatten)]
    pub posting: LedgerPosting,
    /// Balance after this line.
    pub balance: Decimal,
}

/// Account ledger (general ledger view of one account).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLedgerReport {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Normal balance side.
    pub normal_balance: NormalBalance,
    /// Lines ordered by `(date, entry_no)`.
    pub lines: Vec<AccountLedgerLine>,
    /// Balance after the last line.
    pub closing_balance: Decimal,
}
