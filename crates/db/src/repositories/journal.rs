//! Journal repository: the posting engine's storage side.
//!
//! `post` is the only way an entry reaches the journal. It validates the
//! candidate with `PostingRules` and writes the header and all lines in one
//! transaction. Uniqueness of `(owner_id, entry_no)` is enforced by the
//! database, so two concurrent posts with the same number produce exactly
//! one success.

use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Alias, Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, LoaderTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use neraca_core::account::AccountCode;
use neraca_core::ledger::types::{ADJUSTING_TAG, CLOSING_TAG};
use neraca_core::ledger::{
    CandidateEntry, EntryKind, JournalEntry, JournalFilter, JournalLine, LedgerError,
    PostingRules, ValidatedEntry,
};
use neraca_shared::types::{JournalId, OwnerId, round_money};

use super::error::{storage_failure, unique_violation_or_storage};
use crate::entities::{accounts, journal_details, journals};

/// An entry committed by `post`.
#[derive(Debug, Clone)]
pub struct PostedEntry {
    /// Storage identifier.
    pub id: JournalId,
    /// The entry as written.
    pub entry: ValidatedEntry,
}

/// One page of a journal listing.
#[derive(Debug, Clone)]
pub struct JournalPage {
    /// Entries on this page.
    pub entries: Vec<JournalEntry>,
    /// Total number of matching entries.
    pub total: u64,
    /// Current page (0-indexed).
    pub page: u64,
    /// Page size.
    pub page_size: u64,
    /// Total pages.
    pub total_pages: u64,
}

/// Journal repository for posting, deleting and listing entries.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and atomically commits an entry.
    ///
    /// # Errors
    ///
    /// Returns the first posting rule violated, `DuplicateEntryNumber`, or
    /// `StorageFailure`. On error nothing is written.
    pub async fn post(
        &self,
        candidate: CandidateEntry,
        tolerance: Decimal,
    ) -> Result<PostedEntry, LedgerError> {
        let txn = self.db.begin().await.map_err(storage_failure)?;

        let posted = post_in(&txn, candidate, tolerance).await?;

        txn.commit().await.map_err(storage_failure)?;
        info!(
            owner_id = %posted.entry.owner,
            entry_no = %posted.entry.entry_no,
            kind = ?posted.entry.kind,
            lines = posted.entry.lines.len(),
            debit = %posted.entry.totals.debit,
            "Journal entry posted"
        );
        Ok(posted)
    }

    /// Deletes an entry and all of its lines.
    ///
    /// Returns the accounts the entry touched.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the owner has no entry with that number,
    /// or `StorageFailure`.
    pub async fn delete(
        &self,
        owner: OwnerId,
        entry_no: &str,
    ) -> Result<Vec<AccountCode>, LedgerError> {
        let txn = self.db.begin().await.map_err(storage_failure)?;

        let journal = journals::Entity::find()
            .filter(journals::Column::OwnerId.eq(owner.into_inner()))
            .filter(journals::Column::EntryNo.eq(entry_no))
            .one(&txn)
            .await
            .map_err(storage_failure)?
            .ok_or_else(|| LedgerError::EntryNotFound(entry_no.to_string()))?;

        let lines = journal_details::Entity::find()
            .filter(journal_details::Column::JournalId.eq(journal.id))
            .all(&txn)
            .await
            .map_err(storage_failure)?;

        // Lines first so the delete does not rely on ON DELETE CASCADE.
        journal_details::Entity::delete_many()
            .filter(journal_details::Column::JournalId.eq(journal.id))
            .exec(&txn)
            .await
            .map_err(storage_failure)?;
        journals::Entity::delete_by_id(journal.id)
            .exec(&txn)
            .await
            .map_err(storage_failure)?;

        txn.commit().await.map_err(storage_failure)?;

        let mut touched: Vec<AccountCode> = lines
            .iter()
            .filter_map(|l| AccountCode::parse(&l.account_code).ok())
            .collect();
        touched.sort();
        touched.dedup();

        info!(owner_id = %owner, entry_no, lines = lines.len(), "Journal entry deleted");
        Ok(touched)
    }

    /// Finds one entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the query fails.
    pub async fn find(
        &self,
        owner: OwnerId,
        entry_no: &str,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        let headers = journals::Entity::find()
            .filter(journals::Column::OwnerId.eq(owner.into_inner()))
            .filter(journals::Column::EntryNo.eq(entry_no))
            .all(&self.db)
            .await
            .map_err(storage_failure)?;

        Ok(self.with_lines(headers).await?.into_iter().next())
    }

    /// Lists entries matching `filter`, ordered by `(date, entry_no)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if a query fails.
    pub async fn list(
        &self,
        owner: OwnerId,
        filter: &JournalFilter,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        let headers = Self::filtered(owner, filter)
            .all(&self.db)
            .await
            .map_err(storage_failure)?;

        let entries = self.with_lines(headers).await?;
        Ok(entries.into_iter().filter(|e| filter.matches(e)).collect())
    }

    /// Fetches one page of a listing. Pages are independent, so a reader can
    /// stop and restart at any page.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if a query fails.
    pub async fn page(
        &self,
        owner: OwnerId,
        filter: &JournalFilter,
        page: u64,
        page_size: u64,
    ) -> Result<JournalPage, LedgerError> {
        let page_size = page_size.max(1);
        let paginator = Self::filtered(owner, filter).paginate(&self.db, page_size);

        let counts = paginator.num_items_and_pages().await.map_err(storage_failure)?;
        let headers = paginator.fetch_page(page).await.map_err(storage_failure)?;

        Ok(JournalPage {
            entries: self.with_lines(headers).await?,
            total: counts.number_of_items,
            page,
            page_size,
            total_pages: counts.number_of_pages,
        })
    }

    /// Counts the owner's entries, optionally of one kind.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the query fails.
    pub async fn count(&self, owner: OwnerId, kind: Option<EntryKind>) -> Result<u64, LedgerError> {
        let rows: Vec<(String, String)> = journals::Entity::find()
            .select_only()
            .column(journals::Column::EntryNo)
            .column(journals::Column::Description)
            .filter(journals::Column::OwnerId.eq(owner.into_inner()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(storage_failure)?;

        let count = rows
            .iter()
            .filter(|(no, description)| {
                kind.is_none_or(|k| EntryKind::classify(no, description) == k)
            })
            .count();
        Ok(count as u64)
    }

    fn filtered(owner: OwnerId, filter: &JournalFilter) -> sea_orm::Select<journals::Entity> {
        let mut query = journals::Entity::find()
            .filter(journals::Column::OwnerId.eq(owner.into_inner()))
            .order_by_asc(journals::Column::Date)
            .order_by_asc(journals::Column::EntryNo);

        if let Some(from) = filter.from {
            query = query.filter(journals::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(journals::Column::Date.lte(to));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(kind_condition(kind));
        }
        query
    }

    async fn with_lines(
        &self,
        headers: Vec<journals::Model>,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        let lines = headers
            .load_many(journal_details::Entity, &self.db)
            .await
            .map_err(storage_failure)?;

        Ok(headers
            .into_iter()
            .zip(lines)
            .map(|(header, lines)| to_domain(header, lines))
            .collect())
    }
}

/// Validates a candidate against the accounts visible on `conn` and writes it.
pub(crate) async fn post_in<C: ConnectionTrait>(
    conn: &C,
    candidate: CandidateEntry,
    tolerance: Decimal,
) -> Result<PostedEntry, LedgerError> {
    let codes: Vec<String> = candidate
        .lines
        .iter()
        .map(|l| l.account_code.trim().to_string())
        .collect();
    let known: HashSet<String> = accounts::Entity::find()
        .filter(accounts::Column::Code.is_in(codes))
        .all(conn)
        .await
        .map_err(storage_failure)?
        .into_iter()
        .map(|a| a.code)
        .collect();

    let entry = PostingRules::validate(candidate, tolerance, |code| known.contains(code.as_str()))?;
    let id = insert_entry(conn, &entry).await?;
    debug!(entry_no = %entry.entry_no, journal_id = %id, "Entry written");

    Ok(PostedEntry { id, entry })
}

/// Writes a validated entry's header and lines.
async fn insert_entry<C: ConnectionTrait>(
    conn: &C,
    entry: &ValidatedEntry,
) -> Result<JournalId, LedgerError> {
    let id = JournalId::new();

    let header = journals::ActiveModel {
        id: Set(id.into_inner()),
        entry_no: Set(entry.entry_no.clone()),
        date: Set(entry.date),
        description: Set(entry.description.clone()),
        owner_id: Set(entry.owner.into_inner()),
        created_at: Set(Utc::now()),
    };
    journals::Entity::insert(header)
        .exec_without_returning(conn)
        .await
        .map_err(|e| {
            unique_violation_or_storage(e, || {
                LedgerError::DuplicateEntryNumber(entry.entry_no.clone())
            })
        })?;

    let lines = entry.lines.iter().zip(1..).map(|(line, line_no)| journal_details::ActiveModel {
        id: Set(Uuid::now_v7()),
        journal_id: Set(id.into_inner()),
        line_no: Set(line_no),
        account_code: Set(line.account_code.to_string()),
        debit: Set(line.debit),
        credit: Set(line.credit),
    });
    journal_details::Entity::insert_many(lines)
        .exec_without_returning(conn)
        .await
        .map_err(storage_failure)?;

    Ok(id)
}

/// SQL condition selecting entries of one kind, mirroring `EntryKind::classify`.
fn kind_condition(kind: EntryKind) -> Condition {
    let closing = has_prefix(journals::Column::Description, CLOSING_TAG);
    let adjusting = has_prefix(journals::Column::Description, ADJUSTING_TAG);
    let cash = |k: EntryKind| {
        let mut condition = Condition::all();
        if let Some(prefix) = k.entry_no_prefix() {
            condition = condition.add(has_prefix(journals::Column::EntryNo, prefix));
        }
        if let Some(prefix) = k.description_prefix() {
            condition = condition.add(has_prefix(journals::Column::Description, prefix));
        }
        condition
    };

    match kind {
        EntryKind::Closing => Condition::all().add(closing),
        EntryKind::Adjusting => Condition::all().add(adjusting),
        EntryKind::CashPayment | EntryKind::CashReceipt => cash(kind),
        EntryKind::Standard => Condition::all()
            .add(Condition::not(Condition::any().add(closing)))
            .add(Condition::not(Condition::any().add(adjusting)))
            .add(Condition::not(cash(EntryKind::CashPayment)))
            .add(Condition::not(cash(EntryKind::CashReceipt))),
    }
}

/// Case-sensitive prefix match. `LIKE` ignores ASCII case on SQLite.
fn has_prefix(column: journals::Column, prefix: &str) -> SimpleExpr {
    let len = i32::try_from(prefix.chars().count()).unwrap_or(i32::MAX);
    Expr::expr(
        Func::cust(Alias::new("substr"))
            .arg(Expr::col((journals::Entity, column)))
            .arg(1)
            .arg(len),
    )
    .eq(prefix)
}

fn to_domain(header: journals::Model, mut lines: Vec<journal_details::Model>) -> JournalEntry {
    lines.sort_by_key(|l| l.line_no);
    JournalEntry {
        id: JournalId::from_uuid(header.id),
        kind: EntryKind::classify(&header.entry_no, &header.description),
        entry_no: header.entry_no,
        date: header.date,
        description: header.description,
        owner: OwnerId::from_uuid(header.owner_id),
        lines: lines
            .into_iter()
            .map(|l| JournalLine {
                line_no: l.line_no,
                account_code: l.account_code,
                debit: round_money(l.debit),
                credit: round_money(l.credit),
            })
            .collect(),
    }
}
