//! Balance repository: derives account balances from journal lines.
//!
//! Nothing here is stored. Every call aggregates the owner's journal lines,
//! so a balance is always consistent with the journal it was read from.
//! Amounts are summed in Rust after normalization, which keeps results
//! identical across database backends.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use neraca_core::account::{Account, AccountCode};
use neraca_core::ledger::{AccountBalance, LedgerError};
use neraca_core::reports::LedgerPosting;
use neraca_shared::types::{OwnerId, round_money};

use super::account::{find_account, list_accounts};
use super::error::storage_failure;
use crate::entities::{journal_details, journals};

/// Debit and credit totals per account code.
pub(crate) type TotalsByAccount = HashMap<String, (Decimal, Decimal)>;

/// Balance repository for derived balance queries.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    db: DatabaseConnection,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the balance of one account within an owner scope.
    ///
    /// An account without lines has a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccount` if the code is not registered, or `StorageFailure`.
    pub async fn account_balance(
        &self,
        owner: OwnerId,
        code: &AccountCode,
    ) -> Result<AccountBalance, LedgerError> {
        let account = find_account(&self.db, code.as_str())
            .await?
            .ok_or_else(|| LedgerError::UnknownAccount(code.to_string()))?;
        let totals = owner_totals(&self.db, owner, Some(code.as_str())).await?;
        Ok(balance_from(&account, &totals))
    }

    /// Returns the balance of every registered account, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if a query fails.
    pub async fn all_balances(&self, owner: OwnerId) -> Result<Vec<AccountBalance>, LedgerError> {
        all_balances(&self.db, owner).await
    }

    /// Returns one account's lines ordered by `(date, entry_no)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the query fails.
    pub async fn postings(
        &self,
        owner: OwnerId,
        code: &AccountCode,
    ) -> Result<Vec<LedgerPosting>, LedgerError> {
        let rows = journal_details::Entity::find()
            .find_also_related(journals::Entity)
            .filter(journal_details::Column::AccountCode.eq(code.as_str()))
            .filter(journals::Column::OwnerId.eq(owner.into_inner()))
            .order_by_asc(journals::Column::Date)
            .order_by_asc(journals::Column::EntryNo)
            .order_by_asc(journal_details::Column::LineNo)
            .all(&self.db)
            .await
            .map_err(storage_failure)?;

        Ok(rows
            .into_iter()
            .filter_map(|(line, journal)| {
                journal.map(|journal| LedgerPosting {
                    date: journal.date,
                    entry_no: journal.entry_no,
                    description: journal.description,
                    debit: round_money(line.debit),
                    credit: round_money(line.credit),
                })
            })
            .collect())
    }

    /// Sums every line of an account across all owners.
    ///
    /// Used by the deletion guard, since the chart of accounts is shared.
    pub(crate) async fn global_totals<C: ConnectionTrait>(
        conn: &C,
        code: &str,
    ) -> Result<(Decimal, Decimal), LedgerError> {
        let lines = journal_details::Entity::find()
            .filter(journal_details::Column::AccountCode.eq(code))
            .all(conn)
            .await
            .map_err(storage_failure)?;

        lines
            .iter()
            .try_fold((Decimal::ZERO, Decimal::ZERO), accumulate)
    }
}

/// Balances of every registered account for `owner`, ordered by code.
pub(crate) async fn all_balances<C: ConnectionTrait>(
    conn: &C,
    owner: OwnerId,
) -> Result<Vec<AccountBalance>, LedgerError> {
    let accounts = list_accounts(conn, &[]).await?;
    let totals = owner_totals(conn, owner, None).await?;
    Ok(accounts.iter().map(|a| balance_from(a, &totals)).collect())
}

/// Debit and credit totals per account for one owner, optionally for a single code.
pub(crate) async fn owner_totals<C: ConnectionTrait>(
    conn: &C,
    owner: OwnerId,
    code: Option<&str>,
) -> Result<TotalsByAccount, LedgerError> {
    let mut query = journal_details::Entity::find()
        .inner_join(journals::Entity)
        .filter(journals::Column::OwnerId.eq(owner.into_inner()));
    if let Some(code) = code {
        query = query.filter(journal_details::Column::AccountCode.eq(code));
    }

    let lines = query.all(conn).await.map_err(storage_failure)?;

    let mut totals = TotalsByAccount::new();
    for line in &lines {
        let entry = totals
            .entry(line.account_code.clone())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        *entry = accumulate(*entry, line)?;
    }
    Ok(totals)
}

/// Adds one line to running debit and credit totals.
fn accumulate(
    (debit, credit): (Decimal, Decimal),
    line: &journal_details::Model,
) -> Result<(Decimal, Decimal), LedgerError> {
    let overflow = || {
        LedgerError::StorageFailure(format!("line totals of {} overflow", line.account_code))
    };
    Ok((
        debit.checked_add(round_money(line.debit)).ok_or_else(overflow)?,
        credit.checked_add(round_money(line.credit)).ok_or_else(overflow)?,
    ))
}

fn balance_from(account: &Account, totals: &TotalsByAccount) -> AccountBalance {
    let (debit, credit) = totals
        .get(account.code.as_str())
        .copied()
        .unwrap_or((Decimal::ZERO, Decimal::ZERO));
    AccountBalance::from_totals(account, debit, credit)
}
