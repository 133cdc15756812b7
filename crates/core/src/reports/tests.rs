//! Tests for the report builders.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use neraca_shared::types::DEFAULT_TOLERANCE;

use super::service::{EquityAccounts, ReportService};
use super::types::{LedgerPosting, TrialBalanceKind};
use crate::account::{Account, AccountCode, AccountType};
use crate::ledger::AccountBalance;

fn account(code: &str, name: &str, account_type: AccountType) -> Account {
    Account {
        code: AccountCode::parse(code).unwrap(),
        name: name.to_string(),
        account_type,
        normal_balance: account_type.normal_balance(),
    }
}

fn balance(
    code: &str,
    account_type: AccountType,
    debit: Decimal,
    credit: Decimal,
) -> AccountBalance {
    AccountBalance::from_totals(&account(code, code, account_type), debit, credit)
}

/// Owner invests 10,000 cash, earns 3,000 service revenue, pays 1,200 rent,
/// withdraws 500 and borrows 2,000.
fn sample_ledger() -> Vec<AccountBalance> {
    vec![
        balance("1-1000", AccountType::Asset, dec!(15000), dec!(1700)),
        balance("2-2100", AccountType::Liability, Decimal::ZERO, dec!(2000)),
        balance("3-3000", AccountType::Equity, Decimal::ZERO, dec!(10000)),
        balance("3-3100", AccountType::Equity, Decimal::ZERO, Decimal::ZERO),
        balance("3-3300", AccountType::Equity, dec!(500), Decimal::ZERO),
        balance("4-4000", AccountType::Revenue, Decimal::ZERO, dec!(3000)),
        balance("5-5100", AccountType::Expense, dec!(1200), Decimal::ZERO),
    ]
}

const EQUITY: EquityAccounts<'static> = EquityAccounts {
    capital: "3-3000",
    retained_earnings: "3-3100",
    drawings: "3-3300",
};

#[test]
fn test_trial_balance_of_sample_ledger() {
    let ledger = sample_ledger();
    let report =
        ReportService::trial_balance(TrialBalanceKind::Unadjusted, &ledger, DEFAULT_TOLERANCE);

    assert_eq!(report.rows.len(), 7);
    assert_eq!(report.totals.total_debit, dec!(15000));
    assert_eq!(report.totals.total_credit, dec!(15000));
    assert!(report.totals.is_balanced);

    let drawings = report.rows.iter().find(|r| r.code == "3-3300").unwrap();
    assert_eq!(drawings.debit, dec!(500));
}

#[test]
fn test_trial_balance_rows_sorted_by_code() {
    let mut ledger = sample_ledger();
    ledger.reverse();
    let report =
        ReportService::trial_balance(TrialBalanceKind::Adjusted, &ledger, DEFAULT_TOLERANCE);
    let codes: Vec<&str> = report.rows.iter().map(|r| r.code.as_str()).collect();
    let mut sorted = codes.clone();
    sorted.sort_unstable();
    assert_eq!(codes, sorted);
    assert_eq!(report.kind, TrialBalanceKind::Adjusted);
}

#[test]
fn test_income_statement() {
    let report = ReportService::income_statement(&sample_ledger());
    assert_eq!(report.revenue.total, dec!(3000));
    assert_eq!(report.expenses.total, dec!(1200));
    assert_eq!(report.net_income, dec!(1800));
}

#[test]
fn test_income_statement_loss() {
    let ledger = vec![
        balance("4-4000", AccountType::Revenue, Decimal::ZERO, dec!(200000)),
        balance("5-5000", AccountType::Expense, dec!(500000), Decimal::ZERO),
    ];
    assert_eq!(ReportService::income_statement(&ledger).net_income, dec!(-300000));
}

#[test]
fn test_statement_sections_skip_zero_balances() {
    let report = ReportService::balance_sheet(&sample_ledger(), DEFAULT_TOLERANCE);
    assert!(report.equity.accounts.iter().all(|a| a.code != "3-3100"));
}

#[test]
fn test_balance_sheet_includes_unclosed_net_income() {
    let report = ReportService::balance_sheet(&sample_ledger(), DEFAULT_TOLERANCE);

    assert_eq!(report.assets.total, dec!(13300));
    assert_eq!(report.liabilities.total, dec!(2000));
    assert_eq!(report.equity.total, dec!(9500));
    assert_eq!(report.current_net_income, dec!(1800));
    assert_eq!(report.total_liabilities_and_equity, dec!(13300));
    assert!(report.is_balanced);
}

#[test]
fn test_equity_statement() {
    let report = ReportService::equity_statement(&sample_ledger(), EQUITY);

    assert_eq!(report.capital, dec!(10000));
    assert_eq!(report.retained_earnings, Decimal::ZERO);
    assert_eq!(report.net_income, dec!(1800));
    assert_eq!(report.withdrawals, dec!(500));
    assert_eq!(report.ending_equity, dec!(11300));
}

#[test]
fn test_post_closing_trial_balance_flags_unclosed_accounts() {
    let report = ReportService::post_closing_trial_balance(&sample_ledger(), DEFAULT_TOLERANCE);

    assert!(report.trial_balance.rows.iter().all(|r| r.account_type.is_permanent()));
    assert_eq!(report.unclosed_accounts.len(), 2);
    assert!(!report.is_fully_closed());
    assert!(!report.trial_balance.totals.is_balanced);
}

#[test]
fn test_post_closing_trial_balance_after_close() {
    let ledger = vec![
        balance("1-1000", AccountType::Asset, dec!(1000), Decimal::ZERO),
        balance("3-3100", AccountType::Equity, Decimal::ZERO, dec!(1000)),
        balance("4-4000", AccountType::Revenue, dec!(1000), dec!(1000)),
    ];
    let report = ReportService::post_closing_trial_balance(&ledger, DEFAULT_TOLERANCE);

    assert!(report.is_fully_closed());
    assert_eq!(report.trial_balance.rows.len(), 2);
    assert!(report.trial_balance.totals.is_balanced);
}

#[test]
fn test_account_ledger_running_balance() {
    let cash = account("1-1000", "Cash", AccountType::Asset);
    let date = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
    let postings = vec![
        LedgerPosting {
            date: date(1),
            entry_no: "JU-1".into(),
            description: "Owner investment".into(),
            debit: dec!(10000),
            credit: Decimal::ZERO,
        },
        LedgerPosting {
            date: date(5),
            entry_no: "CP1".into(),
            description: "Cash Payment: Rent".into(),
            debit: Decimal::ZERO,
            credit: dec!(1200),
        },
    ];

    let report = ReportService::account_ledger(&cash, postings);
    assert_eq!(report.lines.len(), 2);
    assert_eq!(report.lines[0].balance, dec!(10000));
    assert_eq!(report.lines[1].balance, dec!(8800));
    assert_eq!(report.closing_balance, dec!(8800));
    assert_eq!(report.name, "Cash");
}

#[test]
fn test_account_ledger_without_lines() {
    let revenue = account("4-4000", "Service Revenue", AccountType::Revenue);
    let report = ReportService::account_ledger(&revenue, Vec::new());
    assert!(report.lines.is_empty());
    assert_eq!(report.closing_balance, Decimal::ZERO);
}

fn account_type_strategy() -> impl Strategy<Value = AccountType> {
    prop::sample::select(AccountType::ALL.to_vec())
}

/// Balanced postings: each (debited type, credited type, amount) posts the
/// amount as a debit to a fresh account and a credit to another.
fn balanced_ledger_strategy() -> impl Strategy<Value = Vec<AccountBalance>> {
    prop::collection::vec(
        (account_type_strategy(), account_type_strategy(), 1i64..10_000_000i64),
        1..15,
    )
    .prop_map(|postings| {
        postings
            .into_iter()
            .enumerate()
            .flat_map(|(i, (debited, credited, cents))| {
                let amount = Decimal::new(cents, 2);
                vec![
                    balance(&format!("{}-{:04}", 1, i * 2), debited, amount, Decimal::ZERO),
                    balance(&format!("{}-{:04}", 1, i * 2 + 1), credited, Decimal::ZERO, amount),
                ]
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property: Trial balance debits equal credits**
    ///
    /// For any balanced ledger, the trial balance debit column total equals
    /// the credit column total.
    #[test]
    fn prop_trial_balance_is_balanced(ledger in balanced_ledger_strategy()) {
        let report =
            ReportService::trial_balance(TrialBalanceKind::Unadjusted, &ledger, Decimal::ZERO);
        prop_assert_eq!(report.totals.total_debit, report.totals.total_credit);
        prop_assert!(report.totals.is_balanced);
    }

    /// **Property: Balance sheet balances with unclosed income**
    ///
    /// Assets equal liabilities plus equity plus current net income for any
    /// balanced ledger.
    #[test]
    fn prop_balance_sheet_balances(ledger in balanced_ledger_strategy()) {
        let report = ReportService::balance_sheet(&ledger, Decimal::ZERO);
        prop_assert_eq!(report.assets.total, report.total_liabilities_and_equity);
    }
}
