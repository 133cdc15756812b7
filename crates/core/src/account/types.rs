//! Account domain types.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::LedgerError;

/// Account code of the form `<digits>-<digits>`, e.g. `1-1000`.
///
/// Codes order lexicographically, which matches the numeric grouping of the
/// chart because segments are zero-padded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountCode(String);

impl AccountCode {
    /// Parses and validates an account code.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCodeFormat` unless the code is two non-empty digit
    /// segments joined by a single hyphen.
    pub fn parse(code: &str) -> Result<Self, LedgerError> {
        let code = code.trim();
        let valid = code.split_once('-').is_some_and(|(head, tail)| {
            !head.is_empty()
                && !tail.is_empty()
                && head.bytes().all(|b| b.is_ascii_digit())
                && tail.bytes().all(|b| b.is_ascii_digit())
        });

        if valid {
            Ok(Self(code.to_string()))
        } else {
            Err(LedgerError::InvalidCodeFormat(code.to_string()))
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AccountCode {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountCode> for String {
    fn from(code: AccountCode) -> Self {
        code.0
    }
}

impl FromStr for AccountCode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned.
    Asset,
    /// Obligations owed.
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned during the period.
    Revenue,
    /// Costs incurred during the period.
    Expense,
}

impl AccountType {
    /// All account types in chart order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];

    /// Returns the lowercase storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }

    /// Returns the normal balance side required for this type.
    ///
    /// - Asset/Expense: debit-normal
    /// - Liability/Equity/Revenue: credit-normal
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// Revenue and expense accounts are zeroed at period close.
    #[must_use]
    pub const fn is_temporary(self) -> bool {
        matches!(self, Self::Revenue | Self::Expense)
    }

    /// Asset, liability and equity accounts carry forward across periods.
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        !self.is_temporary()
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            _ => Err(LedgerError::InvalidValue {
                field: "account_type",
                value: s.to_string(),
            }),
        }
    }
}

/// The side on which an account's balance naturally increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Balance = debits - credits.
    Debit,
    /// Balance = credits - debits.
    Credit,
}

impl NormalBalance {
    /// Returns the lowercase storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// Applies the normal-balance rule to a pair of totals.
    #[must_use]
    pub fn signed(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

impl fmt::Display for NormalBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NormalBalance {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            _ => Err(LedgerError::InvalidValue {
                field: "normal_balance",
                value: s.to_string(),
            }),
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account code.
    pub code: AccountCode,
    /// Display name.
    pub name: String,
    /// Classification.
    pub account_type: AccountType,
    /// Normal balance side.
    pub normal_balance: NormalBalance,
}

/// Input for registering a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Raw account code, validated on create.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Classification.
    pub account_type: AccountType,
    /// Normal balance side. `None` derives it from the account type.
    pub normal_balance: Option<NormalBalance>,
}

impl NewAccount {
    /// Creates an input whose normal balance follows the account type.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            account_type,
            normal_balance: None,
        }
    }

    /// Sets an explicit normal balance.
    #[must_use]
    pub const fn with_normal_balance(mut self, normal_balance: NormalBalance) -> Self {
        self.normal_balance = Some(normal_balance);
        self
    }
}
