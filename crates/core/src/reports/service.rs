//! Report generation service.

use rust_decimal::Decimal;

use neraca_shared::types::{is_negligible, within_tolerance};

use super::types::{
    AccountLedgerLine, AccountLedgerReport, BalanceSheetReport, EquityStatementReport,
    IncomeStatementReport, LedgerPosting, PostClosingTrialBalance, ReportSection,
    TrialBalanceKind, TrialBalanceReport, TrialBalanceTotals,
};
use crate::account::{Account, AccountType};
use crate::ledger::{AccountBalance, RunningBalance};

/// Account codes the statement of changes in equity reads.
#[derive(Debug, Clone, Copy)]
pub struct EquityAccounts<'a> {
    /// Owner's capital.
    pub capital: &'a str,
    /// Retained earnings.
    pub retained_earnings: &'a str,
    /// Owner's drawings.
    pub drawings: &'a str,
}

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a trial balance from account balances.
    ///
    /// Every account gets a row, including accounts without lines.
    #[must_use]
    pub fn trial_balance(
        kind: TrialBalanceKind,
        balances: &[AccountBalance],
        tolerance: Decimal,
    ) -> TrialBalanceReport {
        let mut rows: Vec<_> = balances.iter().map(AccountBalance::trial_balance_row).collect();
        rows.sort_by(|a, b| a.code.cmp(&b.code));

        let total_debit: Decimal = rows.iter().map(|r| r.debit).sum();
        let total_credit: Decimal = rows.iter().map(|r| r.credit).sum();

        TrialBalanceReport {
            kind,
            rows,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                is_balanced: within_tolerance(total_debit, total_credit, tolerance),
            },
        }
    }

    /// Generates the post-closing trial balance.
    ///
    /// Only permanent accounts are listed. Temporary accounts that still
    /// carry a balance are reported separately.
    #[must_use]
    pub fn post_closing_trial_balance(
        balances: &[AccountBalance],
        tolerance: Decimal,
    ) -> PostClosingTrialBalance {
        let (permanent, temporary): (Vec<_>, Vec<_>) = balances
            .iter()
            .cloned()
            .partition(|b| b.account_type.is_permanent());

        let unclosed_accounts = temporary
            .into_iter()
            .filter(|b| !is_negligible(b.balance, tolerance))
            .collect();

        PostClosingTrialBalance {
            trial_balance: Self::trial_balance(
                TrialBalanceKind::PostClosing,
                &permanent,
                tolerance,
            ),
            unclosed_accounts,
        }
    }

    /// Generates an income statement.
    #[must_use]
    pub fn income_statement(balances: &[AccountBalance]) -> IncomeStatementReport {
        let revenue = Self::section(balances, AccountType::Revenue);
        let expenses = Self::section(balances, AccountType::Expense);
        let net_income = revenue.total - expenses.total;

        IncomeStatementReport {
            revenue,
            expenses,
            net_income,
        }
    }

    /// Generates a balance sheet.
    ///
    /// Net income of temporary accounts that are not yet closed is carried
    /// on the equity side, so the sheet balances before and after closing.
    #[must_use]
    pub fn balance_sheet(balances: &[AccountBalance], tolerance: Decimal) -> BalanceSheetReport {
        let assets = Self::section(balances, AccountType::Asset);
        let liabilities = Self::section(balances, AccountType::Liability);
        let equity = Self::section(balances, AccountType::Equity);
        let current_net_income = Self::income_statement(balances).net_income;

        let total_liabilities_and_equity = liabilities.total + equity.total + current_net_income;
        let is_balanced = within_tolerance(assets.total, total_liabilities_and_equity, tolerance);

        BalanceSheetReport {
            assets,
            liabilities,
            equity,
            current_net_income,
            total_liabilities_and_equity,
            is_balanced,
        }
    }

    /// Generates the statement of changes in equity.
    ///
    /// Drawings are credit-normal equity, so withdrawals appear as a negative
    /// balance and are reported as a positive amount.
    #[must_use]
    pub fn equity_statement(
        balances: &[AccountBalance],
        accounts: EquityAccounts<'_>,
    ) -> EquityStatementReport {
        let balance_of = |code: &str| {
            balances
                .iter()
                .find(|b| b.code == code)
                .map_or(Decimal::ZERO, |b| b.balance)
        };

        let capital = balance_of(accounts.capital);
        let retained_earnings = balance_of(accounts.retained_earnings);
        let withdrawals = -balance_of(accounts.drawings);
        let net_income = Self::income_statement(balances).net_income;

        EquityStatementReport {
            capital,
            retained_earnings,
            net_income,
            withdrawals,
            ending_equity: capital + retained_earnings + net_income - withdrawals,
        }
    }

    /// Builds an account ledger with running balances.
    ///
    /// `postings` must already be ordered by `(date, entry_no)`.
    #[must_use]
    pub fn account_ledger(account: &Account, postings: Vec<LedgerPosting>) -> AccountLedgerReport {
        let mut running = RunningBalance::opening();
        let lines = postings
            .into_iter()
            .map(|posting| {
                running = running.apply(account.normal_balance, posting.debit, posting.credit);
                AccountLedgerLine {
                    posting,
                    balance: running.current_balance,
                }
            })
            .collect();

        AccountLedgerReport {
            code: account.code.to_string(),
            name: account.name.clone(),
            normal_balance: account.normal_balance,
            lines,
            closing_balance: running.current_balance,
        }
    }

    fn section(balances: &[AccountBalance], account_type: AccountType) -> ReportSection {
        let mut accounts: Vec<AccountBalance> = balances
            .iter()
            .filter(|b| b.account_type == account_type && !b.balance.is_zero())
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        ReportSection {
            total: accounts.iter().map(|a| a.balance).sum(),
            accounts,
        }
    }
}
