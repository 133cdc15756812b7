//! Closing period labels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ledger::LedgerError;

/// A monthly closing period, formatted `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodLabel(String);

impl PeriodLabel {
    /// Parses a `YYYY-MM` label.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriodLabel` for anything else, including month `00` or `13`.
    pub fn parse(label: &str) -> Result<Self, LedgerError> {
        let label = label.trim();
        let invalid = || LedgerError::InvalidPeriodLabel(label.to_string());

        let (year, month) = label.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.bytes().chain(month.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }

        Ok(Self(label.to_string()))
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Entry number of the revenue closing entry.
    #[must_use]
    pub fn revenue_entry_no(&self) -> String {
        format!("CL{}", self.0)
    }

    /// Entry number of the expense closing entry.
    #[must_use]
    pub fn expense_entry_no(&self) -> String {
        format!("CL{}-EXP", self.0)
    }

    /// Entry number of the income-summary closing entry.
    #[must_use]
    pub fn income_summary_entry_no(&self) -> String {
        format!("CL{}-INC", self.0)
    }

    /// Base description shared by all closing entries of this period.
    #[must_use]
    pub fn description(&self) -> String {
        format!("Closing entries for period {}", self.0)
    }
}

impl fmt::Display for PeriodLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PeriodLabel {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PeriodLabel {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PeriodLabel> for String {
    fn from(label: PeriodLabel) -> Self {
        label.0
    }
}
