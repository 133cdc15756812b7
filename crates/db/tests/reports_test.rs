//! Integration tests for balance-derived reports.

mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use neraca_core::account::NormalBalance;
use neraca_core::ledger::LedgerError;
use neraca_core::reports::TrialBalanceKind;
use neraca_db::Ledger;
use neraca_shared::types::OwnerId;

use common::{
    BANK, CAPITAL, CASH, DRAWINGS, RENT_EXPENSE, SALARY_EXPENSE, SERVICE_REVENUE, date, ledger,
    simple_entry,
};

/// Capital 10,000; revenue 3,000; salaries 1,200; rent 500; drawings 300.
async fn sample_ledger() -> (Ledger, OwnerId) {
    let ledger = ledger().await;
    let owner = OwnerId::new();

    let entries = [
        ("JU-001", date(2026, 1, 1), CASH, CAPITAL, dec!(10000)),
        ("JU-002", date(2026, 1, 5), BANK, SERVICE_REVENUE, dec!(3000)),
        ("JU-003", date(2026, 1, 10), SALARY_EXPENSE, CASH, dec!(1200)),
        ("JU-004", date(2026, 1, 15), RENT_EXPENSE, BANK, dec!(500)),
        ("JU-005", date(2026, 1, 20), DRAWINGS, CASH, dec!(300)),
    ];
    for (entry_no, on, debit, credit, amount) in entries {
        ledger
            .post_entry(simple_entry(owner, entry_no, on, debit, credit, amount))
            .await
            .unwrap();
    }

    (ledger, owner)
}

#[tokio::test]
async fn test_trial_balance_is_balanced() {
    let (ledger, owner) = sample_ledger().await;

    let report = ledger.trial_balance(owner).await.unwrap();

    assert_eq!(report.kind, TrialBalanceKind::Unadjusted);
    assert_eq!(report.rows.len(), 16);
    assert_eq!(report.totals.total_debit, dec!(13000));
    assert_eq!(report.totals.total_credit, dec!(13000));
    assert!(report.totals.is_balanced);

    let cash = report.rows.iter().find(|r| r.code == CASH).unwrap();
    assert_eq!(cash.debit, dec!(8500));
    assert_eq!(cash.credit, Decimal::ZERO);
    let drawings = report.rows.iter().find(|r| r.code == DRAWINGS).unwrap();
    assert_eq!(drawings.debit, dec!(300));
}

#[tokio::test]
async fn test_adjusted_trial_balance_includes_adjustments() {
    let (ledger, owner) = sample_ledger().await;

    let accrual = simple_entry(owner, "AJ-001", date(2026, 1, 31), SALARY_EXPENSE, BANK, dec!(100));
    ledger.post_adjusting_entry(accrual).await.unwrap();
    let report = ledger.adjusted_trial_balance(owner).await.unwrap();

    assert_eq!(report.kind, TrialBalanceKind::Adjusted);
    assert!(report.totals.is_balanced);
    let salaries = report.rows.iter().find(|r| r.code == SALARY_EXPENSE).unwrap();
    assert_eq!(salaries.debit, dec!(1300));
}

#[tokio::test]
async fn test_income_statement() {
    let (ledger, owner) = sample_ledger().await;

    let report = ledger.income_statement(owner).await.unwrap();

    assert_eq!(report.revenue.total, dec!(3000));
    assert_eq!(report.revenue.accounts.len(), 1);
    assert_eq!(report.expenses.total, dec!(1700));
    assert_eq!(report.expenses.accounts.len(), 2);
    assert_eq!(report.net_income, dec!(1300));
}

#[tokio::test]
async fn test_balance_sheet_balances_with_current_income() {
    let (ledger, owner) = sample_ledger().await;

    let report = ledger.balance_sheet(owner).await.unwrap();

    assert_eq!(report.assets.total, dec!(11000));
    assert_eq!(report.liabilities.total, Decimal::ZERO);
    assert_eq!(report.equity.total, dec!(9700));
    assert_eq!(report.current_net_income, dec!(1300));
    assert_eq!(report.total_liabilities_and_equity, dec!(11000));
    assert!(report.is_balanced);
}

#[tokio::test]
async fn test_equity_statement() {
    let (ledger, owner) = sample_ledger().await;

    let report = ledger.equity_statement(owner).await.unwrap();

    assert_eq!(report.capital, dec!(10000));
    assert_eq!(report.retained_earnings, Decimal::ZERO);
    assert_eq!(report.net_income, dec!(1300));
    assert_eq!(report.withdrawals, dec!(300));
    assert_eq!(report.ending_equity, dec!(11000));
}

#[tokio::test]
async fn test_account_ledger_runs_in_date_order() {
    let (ledger, owner) = sample_ledger().await;

    let report = ledger.account_ledger(owner, CASH).await.unwrap();

    assert_eq!(report.code, CASH);
    assert_eq!(report.normal_balance, NormalBalance::Debit);
    let numbers: Vec<_> = report.lines.iter().map(|l| l.posting.entry_no.as_str()).collect();
    assert_eq!(numbers, ["JU-001", "JU-003", "JU-005"]);
    let running: Vec<_> = report.lines.iter().map(|l| l.balance).collect();
    assert_eq!(running, [dec!(10000), dec!(8800), dec!(8500)]);
    assert_eq!(report.closing_balance, dec!(8500));
    assert_eq!(report.closing_balance, ledger.balance_of(owner, CASH).await.unwrap());
}

#[tokio::test]
async fn test_account_ledger_of_unknown_account() {
    let ledger = ledger().await;

    let err = ledger.account_ledger(OwnerId::new(), "9-9999").await.unwrap_err();
    assert!(matches!(err, LedgerError::UnknownAccount(_)));
}

#[tokio::test]
async fn test_reports_are_scoped_to_owner() {
    let (ledger, _) = sample_ledger().await;

    let report = ledger.trial_balance(OwnerId::new()).await.unwrap();
    assert_eq!(report.totals.total_debit, Decimal::ZERO);
    assert!(report.totals.is_balanced);
}
