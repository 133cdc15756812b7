//! Registry rules for creating and deleting accounts.

use rust_decimal::Decimal;

use neraca_shared::types::is_negligible;

use super::types::{Account, AccountCode, NewAccount};
use crate::ledger::LedgerError;

/// Pure validation for account registry commands.
pub struct AccountRules;

impl AccountRules {
    /// Validates a new account and resolves its normal balance.
    ///
    /// # Errors
    ///
    /// - `InvalidCodeFormat` if the code is not `<digits>-<digits>`
    /// - `MissingField` if the name is blank
    /// - `InconsistentNormalBalance` if an explicit normal balance contradicts the type
    pub fn validate_new(input: NewAccount) -> Result<Account, LedgerError> {
        let code = AccountCode::parse(&input.code)?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(LedgerError::MissingField("name"));
        }

        let expected = input.account_type.normal_balance();
        let normal_balance = input.normal_balance.unwrap_or(expected);
        if normal_balance != expected {
            return Err(LedgerError::InconsistentNormalBalance {
                account_type: input.account_type.to_string(),
                expected: expected.to_string(),
            });
        }

        Ok(Account {
            code,
            name: name.to_string(),
            account_type: input.account_type,
            normal_balance,
        })
    }

    /// Checks that an account may be removed from the registry.
    ///
    /// Referencing lines are checked before the balance, so an account whose
    /// lines net to zero still reports `AccountHasTransactions`.
    ///
    /// # Errors
    ///
    /// - `AccountHasTransactions` if any journal line references the account
    /// - `AccountHasBalance` if the computed balance exceeds `tolerance`
    pub fn validate_deletion(
        code: &AccountCode,
        line_count: u64,
        balance: Decimal,
        tolerance: Decimal,
    ) -> Result<(), LedgerError> {
        if line_count > 0 {
            return Err(LedgerError::AccountHasTransactions {
                code: code.to_string(),
                lines: line_count,
            });
        }

        if !is_negligible(balance, tolerance) {
            return Err(LedgerError::AccountHasBalance {
                code: code.to_string(),
                balance,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountType, NormalBalance};
    use neraca_shared::types::DEFAULT_TOLERANCE;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_new_derives_normal_balance() {
        let new = NewAccount::new("4-4000", "Service Revenue", AccountType::Revenue);
        let account = AccountRules::validate_new(new).unwrap();
        assert_eq!(account.normal_balance, NormalBalance::Credit);
        assert_eq!(account.code.as_str(), "4-4000");
    }

    #[test]
    fn test_validate_new_trims_name() {
        let new = NewAccount::new("1-1000", "  Cash  ", AccountType::Asset);
        let account = AccountRules::validate_new(new).unwrap();
        assert_eq!(account.name, "Cash");
    }

    #[test]
    fn test_validate_new_rejects_bad_code() {
        let result =
            AccountRules::validate_new(NewAccount::new("11000", "Cash", AccountType::Asset));
        assert!(matches!(result, Err(LedgerError::InvalidCodeFormat(_))));
    }

    #[test]
    fn test_validate_new_rejects_blank_name() {
        let result =
            AccountRules::validate_new(NewAccount::new("1-1000", "   ", AccountType::Asset));
        assert!(matches!(result, Err(LedgerError::MissingField("name"))));
    }

    #[test]
    fn test_validate_new_rejects_inconsistent_normal_balance() {
        let input = NewAccount::new("5-5000", "Salary Expense", AccountType::Expense)
            .with_normal_balance(NormalBalance::Credit);
        let result = AccountRules::validate_new(input);
        assert!(matches!(
            result,
            Err(LedgerError::InconsistentNormalBalance { .. })
        ));
    }

    #[test]
    fn test_validate_new_accepts_matching_explicit_normal_balance() {
        let input = NewAccount::new("2-2000", "Accounts Payable", AccountType::Liability)
            .with_normal_balance(NormalBalance::Credit);
        assert!(AccountRules::validate_new(input).is_ok());
    }

    #[test]
    fn test_deletion_blocked_by_lines() {
        let code = AccountCode::parse("1-1000").unwrap();
        let result = AccountRules::validate_deletion(&code, 2, Decimal::ZERO, DEFAULT_TOLERANCE);
        assert!(matches!(
            result,
            Err(LedgerError::AccountHasTransactions { lines: 2, .. })
        ));
    }

    #[test]
    fn test_deletion_blocked_by_balance() {
        let code = AccountCode::parse("1-1000").unwrap();
        let result = AccountRules::validate_deletion(&code, 0, dec!(0.02), DEFAULT_TOLERANCE);
        assert!(matches!(result, Err(LedgerError::AccountHasBalance { .. })));
    }

    #[test]
    fn test_deletion_allowed_when_clean() {
        let code = AccountCode::parse("1-1000").unwrap();
        assert!(AccountRules::validate_deletion(&code, 0, dec!(0.01), DEFAULT_TOLERANCE).is_ok());
    }
}
