//! Closing plan synthesis.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use neraca_shared::types::OwnerId;

use super::period::PeriodLabel;
use crate::account::{AccountCode, AccountType, NormalBalance};
use crate::ledger::{AccountBalance, CandidateEntry, EntryKind};

/// Equity accounts the closing procedure posts against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosingAccounts {
    /// Clearing account that nets revenue against expense.
    pub income_summary: AccountCode,
    /// Account that receives net income.
    pub retained_earnings: AccountCode,
}

/// The closing steps that post an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingStep {
    /// Revenue accounts into income summary.
    CloseRevenue,
    /// Expense accounts into income summary.
    CloseExpenses,
    /// Income summary into retained earnings.
    CloseIncomeSummary,
}

/// One closing entry to post.
#[derive(Debug, Clone)]
pub struct PlannedEntry {
    /// The step that produced the entry.
    pub step: ClosingStep,
    /// The entry, ready for the posting rules.
    pub candidate: CandidateEntry,
}

/// Everything a closing run will post.
#[derive(Debug, Clone)]
pub struct ClosingPlan {
    /// Period being closed.
    pub period: PeriodLabel,
    /// Sum of revenue balances.
    pub total_revenue: Decimal,
    /// Sum of expense balances.
    pub total_expense: Decimal,
    /// Revenue minus expense.
    pub net_income: Decimal,
    /// Zero to three entries in step order.
    pub entries: Vec<PlannedEntry>,
}

impl ClosingPlan {
    /// True if the run has nothing to post.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pure closing-plan builder.
pub struct ClosingPlanner;

impl ClosingPlanner {
    /// Builds the closing plan for `owner` from current account balances.
    ///
    /// Temporary accounts with an exactly zero balance get no line. An
    /// account with a contra balance is closed on the opposite side so it
    /// still ends at zero and each entry stays balanced.
    #[must_use]
    pub fn plan(
        period: &PeriodLabel,
        owner: OwnerId,
        date: NaiveDate,
        accounts: &ClosingAccounts,
        balances: &[AccountBalance],
    ) -> ClosingPlan {
        let revenue = Self::temporary(balances, AccountType::Revenue);
        let expenses = Self::temporary(balances, AccountType::Expense);

        let total_revenue: Decimal = revenue.iter().map(|b| b.balance).sum();
        let total_expense: Decimal = expenses.iter().map(|b| b.balance).sum();
        let net_income = total_revenue - total_expense;

        let base = period.description();
        let mut entries = Vec::with_capacity(3);

        if !total_revenue.is_zero() {
            // Revenue is credit-normal: debit each account for its balance.
            let mut candidate =
                Self::candidate(owner, date, period.revenue_entry_no(), base.clone());
            for account in &revenue {
                candidate = Self::reverse_balance(candidate, account, AccountType::Revenue);
            }
            candidate = Self::post_side(candidate, &accounts.income_summary, total_revenue, false);
            entries.push(PlannedEntry {
                step: ClosingStep::CloseRevenue,
                candidate,
            });
        }

        if !total_expense.is_zero() {
            // Expense is debit-normal: credit each account for its balance.
            let mut candidate = Self::candidate(
                owner,
                date,
                period.expense_entry_no(),
                format!("{base} - Expenses"),
            );
            candidate = Self::post_side(candidate, &accounts.income_summary, total_expense, true);
            for account in &expenses {
                candidate = Self::reverse_balance(candidate, account, AccountType::Expense);
            }
            entries.push(PlannedEntry {
                step: ClosingStep::CloseExpenses,
                candidate,
            });
        }

        if !net_income.is_zero() {
            // Profit: Dr income summary / Cr retained earnings. Loss: the reverse.
            let mut candidate = Self::candidate(
                owner,
                date,
                period.income_summary_entry_no(),
                format!("{base} - Income Summary"),
            );
            let profit = net_income > Decimal::ZERO;
            let amount = net_income.abs();
            candidate = Self::post_side(candidate, &accounts.income_summary, amount, profit);
            candidate = Self::post_side(candidate, &accounts.retained_earnings, amount, !profit);
            entries.push(PlannedEntry {
                step: ClosingStep::CloseIncomeSummary,
                candidate,
            });
        }

        ClosingPlan {
            period: period.clone(),
            total_revenue,
            total_expense,
            net_income,
            entries,
        }
    }

    fn temporary(balances: &[AccountBalance], account_type: AccountType) -> Vec<&AccountBalance> {
        balances
            .iter()
            .filter(|b| b.account_type == account_type && !b.balance.is_zero())
            .collect()
    }

    fn candidate(
        owner: OwnerId,
        date: NaiveDate,
        entry_no: String,
        description: String,
    ) -> CandidateEntry {
        CandidateEntry::new(owner, entry_no, date, description).with_kind(EntryKind::Closing)
    }

    /// Posts `amount` (positive) on the debit side if `debit`, else credit.
    /// A negative amount flips the side.
    fn post_side(
        candidate: CandidateEntry,
        code: &AccountCode,
        amount: Decimal,
        debit: bool,
    ) -> CandidateEntry {
        let debit = debit == (amount >= Decimal::ZERO);
        if debit {
            candidate.debit(code.as_str(), amount.abs())
        } else {
            candidate.credit(code.as_str(), amount.abs())
        }
    }

    /// Posts the line that brings `account` to zero.
    fn reverse_balance(
        candidate: CandidateEntry,
        account: &AccountBalance,
        account_type: AccountType,
    ) -> CandidateEntry {
        let debit = account_type.normal_balance() == NormalBalance::Credit;
        if debit == (account.balance > Decimal::ZERO) {
            candidate.debit(account.code.as_str(), account.balance.abs())
        } else {
            candidate.credit(account.code.as_str(), account.balance.abs())
        }
    }
}
