//! Posting rules applied to every candidate entry before it is written.

use rust_decimal::Decimal;

use neraca_shared::types::{MAX_AMOUNT, round_money};

use super::error::LedgerError;
use super::types::{CandidateEntry, EntryTotals, ValidatedEntry, ValidatedLine};
use crate::account::AccountCode;

/// Pure validation for the posting engine.
///
/// The same rules run for ordinary, adjusting, cash and closing entries.
pub struct PostingRules;

impl PostingRules {
    /// Validates a candidate entry.
    ///
    /// Steps, in order:
    /// 1. `entry_no` and `description` must be non-blank
    /// 2. amounts are normalized to two fraction digits; negatives and amounts
    ///    above `MAX_AMOUNT` are rejected
    /// 3. lines with both amounts zero are dropped; at least one must remain
    /// 4. debits must equal credits within `tolerance`
    /// 5. every account code must be well-formed and known to `account_exists`
    ///
    /// # Errors
    ///
    /// Returns the first rule violated. Nothing is written on error.
    pub fn validate<F>(
        candidate: CandidateEntry,
        tolerance: Decimal,
        account_exists: F,
    ) -> Result<ValidatedEntry, LedgerError>
    where
        F: Fn(&AccountCode) -> bool,
    {
        let entry_no = candidate.entry_no.trim().to_string();
        if entry_no.is_empty() {
            return Err(LedgerError::MissingField("entry_no"));
        }
        let description = candidate.description.trim();
        if description.is_empty() {
            return Err(LedgerError::MissingField("description"));
        }

        let mut lines = Vec::with_capacity(candidate.lines.len());
        for line in candidate.lines {
            let debit = round_money(line.debit);
            let credit = round_money(line.credit);

            if debit < Decimal::ZERO || credit < Decimal::ZERO {
                return Err(LedgerError::NegativeAmount {
                    account_code: line.account_code,
                });
            }
            if let Some(amount) = [debit, credit].into_iter().find(|a| *a > MAX_AMOUNT) {
                return Err(LedgerError::InvalidValue {
                    field: "amount",
                    value: amount.to_string(),
                });
            }
            if debit.is_zero() && credit.is_zero() {
                continue;
            }

            let account_code = AccountCode::parse(&line.account_code)?;
            lines.push(ValidatedLine {
                account_code,
                debit,
                credit,
            });
        }

        if lines.is_empty() {
            return Err(LedgerError::NoLines);
        }

        let totals = EntryTotals::of(&lines).ok_or_else(|| LedgerError::InvalidValue {
            field: "amount",
            value: "sum of lines out of range".to_string(),
        })?;
        if !totals.is_balanced(tolerance) {
            return Err(LedgerError::Unbalanced {
                debit: totals.debit,
                credit: totals.credit,
            });
        }

        if let Some(unknown) = lines.iter().find(|l| !account_exists(&l.account_code)) {
            return Err(LedgerError::UnknownAccount(unknown.account_code.to_string()));
        }

        Ok(ValidatedEntry {
            entry_no,
            date: candidate.date,
            description: candidate.kind.tag_description(description),
            owner: candidate.owner,
            kind: candidate.kind,
            lines,
            totals,
        })
    }
}
