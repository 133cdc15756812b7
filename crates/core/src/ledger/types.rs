//! Journal entry types for posting and reporting.
//!
//! An entry's kind is not stored in its own column. It is carried by a
//! tagging convention on the description and entry number, so entries posted
//! by any client remain classifiable.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use neraca_shared::types::{JournalId, OwnerId, within_tolerance};

use crate::account::AccountCode;

/// Description prefix of adjusting entries.
pub const ADJUSTING_TAG: &str = "[ADJUSTING] ";
/// Description prefix of closing entries.
pub const CLOSING_TAG: &str = "[CLOSING] ";
/// Entry number prefix of cash payments.
pub const CASH_PAYMENT_PREFIX: &str = "CP";
/// Entry number prefix of cash receipts.
pub const CASH_RECEIPT_PREFIX: &str = "CR";
/// Description prefix of cash payments.
pub const CASH_PAYMENT_LABEL: &str = "Cash Payment: ";
/// Description prefix of cash receipts.
pub const CASH_RECEIPT_LABEL: &str = "Cash Receipt: ";

/// Classification of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Ordinary general-journal entry.
    Standard,
    /// End-of-period adjustment.
    Adjusting,
    /// Generated by the period-closing procedure.
    Closing,
    /// Cash paid out (credit to the cash account).
    CashPayment,
    /// Cash received (debit to the cash account).
    CashReceipt,
}

impl EntryKind {
    /// Recovers the kind from an entry's number and description.
    #[must_use]
    pub fn classify(entry_no: &str, description: &str) -> Self {
        if description.starts_with(CLOSING_TAG) {
            Self::Closing
        } else if description.starts_with(ADJUSTING_TAG) {
            Self::Adjusting
        } else if entry_no.starts_with(CASH_PAYMENT_PREFIX)
            && description.starts_with(CASH_PAYMENT_LABEL)
        {
            Self::CashPayment
        } else if entry_no.starts_with(CASH_RECEIPT_PREFIX)
            && description.starts_with(CASH_RECEIPT_LABEL)
        {
            Self::CashReceipt
        } else {
            Self::Standard
        }
    }

    /// Returns the description prefix that marks this kind.
    #[must_use]
    pub const fn description_prefix(self) -> Option<&'static str> {
        match self {
            Self::Standard => None,
            Self::Adjusting => Some(ADJUSTING_TAG),
            Self::Closing => Some(CLOSING_TAG),
            Self::CashPayment => Some(CASH_PAYMENT_LABEL),
            Self::CashReceipt => Some(CASH_RECEIPT_LABEL),
        }
    }

    /// Returns the entry number prefix that marks this kind.
    #[must_use]
    pub const fn entry_no_prefix(self) -> Option<&'static str> {
        match self {
            Self::CashPayment => Some(CASH_PAYMENT_PREFIX),
            Self::CashReceipt => Some(CASH_RECEIPT_PREFIX),
            Self::Standard | Self::Adjusting | Self::Closing => None,
        }
    }

    /// Prefixes `description` with this kind's tag unless it already carries it.
    #[must_use]
    pub fn tag_description(self, description: &str) -> String {
        match self.description_prefix() {
            Some(prefix) if !description.starts_with(prefix) => format!("{prefix}{description}"),
            _ => description.to_string(),
        }
    }

    /// Prefixes `number` with this kind's entry number prefix unless already present.
    #[must_use]
    pub fn tag_entry_no(self, number: &str) -> String {
        match self.entry_no_prefix() {
            Some(prefix) if !number.starts_with(prefix) => format!("{prefix}{number}"),
            _ => number.to_string(),
        }
    }
}

/// One submitted line of a candidate entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalLineInput {
    /// Raw account code.
    pub account_code: String,
    /// Debit amount (non-negative).
    pub debit: Decimal,
    /// Credit amount (non-negative).
    pub credit: Decimal,
}

impl JournalLineInput {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            debit: Decimal::ZERO,
            credit: amount,
        }
    }
}

/// A journal entry submitted for posting.
#[derive(Debug, Clone)]
pub struct CandidateEntry {
    /// Entry number, unique within the owner scope.
    pub entry_no: String,
    /// Accounting date.
    pub date: NaiveDate,
    /// Free-text description. Tagged with the kind prefix on validation.
    pub description: String,
    /// Owner scope.
    pub owner: OwnerId,
    /// Entry kind.
    pub kind: EntryKind,
    /// Submitted lines, possibly including all-zero lines.
    pub lines: Vec<JournalLineInput>,
}

impl CandidateEntry {
    /// Creates a standard entry candidate.
    #[must_use]
    pub fn new(
        owner: OwnerId,
        entry_no: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            entry_no: entry_no.into(),
            date,
            description: description.into(),
            owner,
            kind: EntryKind::Standard,
            lines: Vec::new(),
        }
    }

    /// Sets the entry kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = kind;
        self
    }

    /// Appends a line.
    #[must_use]
    pub fn line(mut self, line: JournalLineInput) -> Self {
        self.lines.push(line);
        self
    }

    /// Appends a debit line.
    #[must_use]
    pub fn debit(self, account_code: impl Into<String>, amount: Decimal) -> Self {
        self.line(JournalLineInput::debit(account_code, amount))
    }

    /// Appends a credit line.
    #[must_use]
    pub fn credit(self, account_code: impl Into<String>, amount: Decimal) -> Self {
        self.line(JournalLineInput::credit(account_code, amount))
    }
}

/// A line that passed validation, amounts normalized to two digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLine {
    /// Referenced account.
    pub account_code: AccountCode,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// Entry totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Sum of debits.
    pub debit: Decimal,
    /// Sum of credits.
    pub credit: Decimal,
}

impl EntryTotals {
    /// Sums a set of validated lines. Returns `None` if a sum overflows.
    #[must_use]
    pub fn of(lines: &[ValidatedLine]) -> Option<Self> {
        lines.iter().try_fold(Self::default(), |acc, line| {
            Some(Self {
                debit: acc.debit.checked_add(line.debit)?,
                credit: acc.credit.checked_add(line.credit)?,
            })
        })
    }

    /// Returns true if debits equal credits within `tolerance`.
    #[must_use]
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        within_tolerance(self.debit, self.credit, tolerance)
    }
}

/// A candidate entry ready to be written.
#[derive(Debug, Clone)]
pub struct ValidatedEntry {
    /// Trimmed entry number.
    pub entry_no: String,
    /// Accounting date.
    pub date: NaiveDate,
    /// Description including the kind tag.
    pub description: String,
    /// Owner scope.
    pub owner: OwnerId,
    /// Entry kind.
    pub kind: EntryKind,
    /// Non-zero lines in submission order.
    pub lines: Vec<ValidatedLine>,
    /// Line totals.
    pub totals: EntryTotals,
}

impl ValidatedEntry {
    /// Distinct account codes touched by this entry.
    #[must_use]
    pub fn touched_accounts(&self) -> Vec<AccountCode> {
        let mut codes: Vec<AccountCode> =
            self.lines.iter().map(|l| l.account_code.clone()).collect();
        codes.sort();
        codes.dedup();
        codes
    }
}

/// A committed journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Position within the entry, starting at 1.
    pub line_no: i32,
    /// Referenced account code.
    pub account_code: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// A committed journal entry with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Storage identifier.
    pub id: JournalId,
    /// Entry number.
    pub entry_no: String,
    /// Accounting date.
    pub date: NaiveDate,
    /// Description (tagged).
    pub description: String,
    /// Owner scope.
    pub owner: OwnerId,
    /// Kind recovered from the tagging convention.
    pub kind: EntryKind,
    /// Lines in `line_no` order.
    pub lines: Vec<JournalLine>,
}

impl JournalEntry {
    /// Sums the entry's lines.
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        self.lines.iter().fold(EntryTotals::default(), |acc, line| EntryTotals {
            debit: acc.debit + line.debit,
            credit: acc.credit + line.credit,
        })
    }
}

/// Filters for journal listings. Empty filter returns every entry of the owner.
#[derive(Debug, Clone, Default)]
pub struct JournalFilter {
    /// Restrict to one entry kind.
    pub kind: Option<EntryKind>,
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub to: Option<NaiveDate>,
}

impl JournalFilter {
    /// Filter on a single kind.
    #[must_use]
    pub fn kind(kind: EntryKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Restricts to an inclusive date range.
    #[must_use]
    pub const fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    /// Returns true if `entry` passes this filter.
    #[must_use]
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        self.kind.is_none_or(|kind| entry.kind == kind)
            && self.from.is_none_or(|from| entry.date >= from)
            && self.to.is_none_or(|to| entry.date <= to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("JU-001", "Office supplies", EntryKind::Standard)]
    #[case("AJ-001", "[ADJUSTING] Accrued salaries", EntryKind::Adjusting)]
    #[case("CL2026-01", "[CLOSING] Closing entries for period 2026-01", EntryKind::Closing)]
    #[case("CP001", "Cash Payment: Rent", EntryKind::CashPayment)]
    #[case("CR001", "Cash Receipt: Consulting fee", EntryKind::CashReceipt)]
    #[case("CP001", "Paid rent", EntryKind::Standard)]
    #[case("JU-002", "Cash Receipt: typed by hand", EntryKind::Standard)]
    fn test_classify(
        #[case] entry_no: &str,
        #[case] description: &str,
        #[case] expected: EntryKind,
    ) {
        assert_eq!(EntryKind::classify(entry_no, description), expected);
    }

    #[test]
    fn test_tag_description_is_idempotent() {
        let once = EntryKind::Adjusting.tag_description("Depreciation");
        assert_eq!(once, "[ADJUSTING] Depreciation");
        assert_eq!(EntryKind::Adjusting.tag_description(&once), once);
        assert_eq!(EntryKind::Standard.tag_description("Sales"), "Sales");
    }

    #[test]
    fn test_tag_entry_no() {
        assert_eq!(EntryKind::CashPayment.tag_entry_no("001"), "CP001");
        assert_eq!(EntryKind::CashReceipt.tag_entry_no("CR001"), "CR001");
        assert_eq!(EntryKind::Standard.tag_entry_no("JU-1"), "JU-1");
    }

    #[test]
    fn test_tagged_entries_classify_back() {
        for kind in [EntryKind::CashPayment, EntryKind::CashReceipt] {
            let entry_no = kind.tag_entry_no("7");
            let description = kind.tag_description("Something");
            assert_eq!(EntryKind::classify(&entry_no, &description), kind);
        }
    }

    #[test]
    fn test_candidate_builder() {
        let owner = OwnerId::new();
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let candidate = CandidateEntry::new(owner, "JU-1", date, "Owner investment")
            .debit("1-1000", dec!(500))
            .credit("3-3000", dec!(500));

        assert_eq!(candidate.kind, EntryKind::Standard);
        assert_eq!(candidate.lines.len(), 2);
        assert_eq!(candidate.lines[1], JournalLineInput::credit("3-3000", dec!(500)));
    }

    #[test]
    fn test_entry_totals_balanced_within_tolerance() {
        let totals = EntryTotals {
            debit: dec!(100.00),
            credit: dec!(100.01),
        };
        assert!(totals.is_balanced(dec!(0.01)));
        assert!(!totals.is_balanced(Decimal::ZERO));
    }

    #[test]
    fn test_entry_totals_overflow_is_none() {
        let line = |debit| ValidatedLine {
            account_code: AccountCode::parse("1-1000").unwrap(),
            debit,
            credit: Decimal::ZERO,
        };

        assert!(EntryTotals::of(&[line(Decimal::MAX), line(Decimal::MAX)]).is_none());
        let totals = EntryTotals::of(&[line(dec!(10)), line(dec!(5))]).unwrap();
        assert_eq!(totals.debit, dec!(15));
    }

    #[test]
    fn test_filter_matches() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let entry = JournalEntry {
            id: JournalId::new(),
            entry_no: "AJ-1".into(),
            date,
            description: "[ADJUSTING] Depreciation".into(),
            owner: OwnerId::new(),
            kind: EntryKind::Adjusting,
            lines: vec![],
        };

        assert!(JournalFilter::default().matches(&entry));
        assert!(JournalFilter::kind(EntryKind::Adjusting).matches(&entry));
        assert!(!JournalFilter::kind(EntryKind::Closing).matches(&entry));

        let march = JournalFilter::default().between(
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        );
        assert!(march.matches(&entry));

        let april = JournalFilter::default().between(
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 4, 30).unwrap(),
        );
        assert!(!april.matches(&entry));
    }
}
