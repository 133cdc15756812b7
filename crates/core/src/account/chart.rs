//! Default chart of accounts for a small service business.

use super::types::{AccountType, NewAccount};

const DEFAULT_CHART: &[(&str, &str, AccountType)] = &[
    ("1-1000", "Cash", AccountType::Asset),
    ("1-1100", "Bank", AccountType::Asset),
    ("1-1200", "Accounts Receivable", AccountType::Asset),
    ("1-1300", "Inventory", AccountType::Asset),
    ("2-2000", "Accounts Payable", AccountType::Liability),
    ("2-2100", "Bank Loan", AccountType::Liability),
    ("3-3000", "Owner's Capital", AccountType::Equity),
    ("3-3100", "Retained Earnings", AccountType::Equity),
    ("3-3200", "Income Summary", AccountType::Equity),
    ("3-3300", "Owner's Drawings", AccountType::Equity),
    ("4-4000", "Service Revenue", AccountType::Revenue),
    ("4-4100", "Other Revenue", AccountType::Revenue),
    ("5-5000", "Salary Expense", AccountType::Expense),
    ("5-5100", "Rent Expense", AccountType::Expense),
    ("5-5200", "Utilities Expense", AccountType::Expense),
    ("5-5300", "Supplies Expense", AccountType::Expense),
];

/// Returns the default chart, ordered by code.
///
/// Owner's drawings is registered as an equity account with the credit
/// normal balance its type requires; withdrawals show up as a negative balance.
#[must_use]
pub fn default_chart() -> Vec<NewAccount> {
    DEFAULT_CHART
        .iter()
        .map(|(code, name, account_type)| NewAccount::new(*code, *name, *account_type))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountRules;

    #[test]
    fn test_default_chart_is_valid_and_sorted() {
        let chart = default_chart();
        assert_eq!(chart.len(), 16);

        let accounts: Vec<_> = chart
            .into_iter()
            .map(|input| AccountRules::validate_new(input).unwrap())
            .collect();

        let mut sorted = accounts.clone();
        sorted.sort_by(|a, b| a.code.cmp(&b.code));
        assert_eq!(accounts, sorted);
    }

    #[test]
    fn test_default_chart_contains_closing_accounts() {
        let codes: Vec<String> = default_chart().into_iter().map(|a| a.code).collect();
        for code in ["1-1000", "3-3000", "3-3100", "3-3200", "3-3300"] {
            assert!(codes.iter().any(|c| c == code), "missing {code}");
        }
    }
}
