//! Post-closing verification and the closing run report.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use neraca_shared::types::{ClosingRunId, is_negligible};

use super::period::PeriodLabel;
use crate::ledger::AccountBalance;

/// Non-fatal findings of a closing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClosingWarning {
    /// Temporary accounts still carry a balance after closing.
    IncompleteClosing {
        /// The offending accounts with their remaining balances.
        accounts: Vec<AccountBalance>,
    },
}

/// Checks that closing left every temporary account at zero.
pub struct ClosingVerifier;

impl ClosingVerifier {
    /// Returns `IncompleteClosing` if any revenue or expense balance exceeds `tolerance`.
    #[must_use]
    pub fn verify(balances: &[AccountBalance], tolerance: Decimal) -> Option<ClosingWarning> {
        let accounts: Vec<AccountBalance> = balances
            .iter()
            .filter(|b| b.account_type.is_temporary() && !is_negligible(b.balance, tolerance))
            .cloned()
            .collect();

        if accounts.is_empty() {
            None
        } else {
            Some(ClosingWarning::IncompleteClosing { accounts })
        }
    }
}

/// Outcome of a committed closing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingReport {
    /// Identifier of the recorded run.
    pub run_id: ClosingRunId,
    /// Closed period.
    pub period: PeriodLabel,
    /// Date the closing entries carry.
    pub closing_date: NaiveDate,
    /// Sum of revenue balances before closing.
    pub total_revenue: Decimal,
    /// Sum of expense balances before closing.
    pub total_expense: Decimal,
    /// Revenue minus expense.
    pub net_income: Decimal,
    /// Entry numbers posted, in step order.
    pub entry_numbers: Vec<String>,
    /// Review findings; empty when every temporary account is zero.
    pub warnings: Vec<ClosingWarning>,
}

impl ClosingReport {
    /// True if the run finished without warnings.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Account, AccountCode, AccountType};
    use neraca_shared::types::DEFAULT_TOLERANCE;
    use rust_decimal_macros::dec;

    fn balance(
        code: &str,
        account_type: AccountType,
        debit: Decimal,
        credit: Decimal,
    ) -> AccountBalance {
        let account = Account {
            code: AccountCode::parse(code).unwrap(),
            name: code.to_string(),
            account_type,
            normal_balance: account_type.normal_balance(),
        };
        AccountBalance::from_totals(&account, debit, credit)
    }

    #[test]
    fn test_zeroed_accounts_pass() {
        let balances = vec![
            balance("1-1000", AccountType::Asset, dec!(600), Decimal::ZERO),
            balance("4-4000", AccountType::Revenue, dec!(1000), dec!(1000)),
            balance("5-5000", AccountType::Expense, dec!(400), dec!(400)),
        ];
        assert!(ClosingVerifier::verify(&balances, DEFAULT_TOLERANCE).is_none());
    }

    #[test]
    fn test_rounding_residue_within_tolerance_passes() {
        let balances = vec![balance("5-5000", AccountType::Expense, dec!(100.01), dec!(100.00))];
        assert!(ClosingVerifier::verify(&balances, DEFAULT_TOLERANCE).is_none());
    }

    #[test]
    fn test_leftover_balance_is_reported() {
        let balances = vec![
            balance("4-4000", AccountType::Revenue, Decimal::ZERO, dec!(100)),
            balance("4-4100", AccountType::Revenue, dec!(100), Decimal::ZERO),
            balance("1-1000", AccountType::Asset, dec!(5), Decimal::ZERO),
        ];

        let warning = ClosingVerifier::verify(&balances, DEFAULT_TOLERANCE).unwrap();
        let ClosingWarning::IncompleteClosing { accounts } = warning;
        let codes: Vec<&str> = accounts.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["4-4000", "4-4100"]);
    }
}
