//! Closing repository: runs the period-closing procedure.
//!
//! A run writes its `closing_runs` record and every closing entry inside a
//! single transaction. If any step fails the whole run rolls back, so a
//! period is either fully closed or untouched. The unique
//! `(owner_id, period_label)` index blocks a second close of the same period.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{info, warn};

use neraca_core::account::AccountCode;
use neraca_core::closing::{
    ClosingAccounts, ClosingPlan, ClosingPlanner, ClosingReport, ClosingVerifier, PeriodLabel,
};
use neraca_core::ledger::LedgerError;
use neraca_shared::types::{ClosingRunId, OwnerId};

use super::account::find_account;
use super::balance::all_balances;
use super::error::{storage_failure, unique_violation_or_storage};
use super::journal::post_in;
use crate::entities::closing_runs;

/// Result of a committed run plus the accounts it touched.
#[derive(Debug, Clone)]
pub struct ClosingOutcome {
    /// The run report.
    pub report: ClosingReport,
    /// Accounts that received closing lines.
    pub touched: Vec<AccountCode>,
}

/// Closing repository for period-closing runs.
#[derive(Debug, Clone)]
pub struct ClosingRepository {
    db: DatabaseConnection,
}

impl ClosingRepository {
    /// Creates a new closing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Closes `period` for `owner`.
    ///
    /// # Errors
    ///
    /// - `MissingClosingAccount` if income summary or retained earnings is not registered
    /// - `PeriodAlreadyClosed` if this owner already closed `period`
    /// - any posting error raised by a closing entry
    /// - `StorageFailure`
    pub async fn close_period(
        &self,
        owner: OwnerId,
        period: &PeriodLabel,
        closing_date: NaiveDate,
        accounts: &ClosingAccounts,
        tolerance: Decimal,
    ) -> Result<ClosingOutcome, LedgerError> {
        let txn = self.db.begin().await.map_err(storage_failure)?;

        for code in [&accounts.income_summary, &accounts.retained_earnings] {
            if find_account(&txn, code.as_str()).await?.is_none() {
                return Err(LedgerError::MissingClosingAccount(code.to_string()));
            }
        }

        // ComputeTemporaryBalances
        let balances = all_balances(&txn, owner).await?;
        let plan = ClosingPlanner::plan(period, owner, closing_date, accounts, &balances);

        let run_id = ClosingRunId::new();
        insert_run(&txn, run_id, owner, period, closing_date, &plan).await?;

        let mut entry_numbers = Vec::with_capacity(plan.entries.len());
        let mut touched = Vec::new();
        for planned in plan.entries {
            let posted = post_in(&txn, planned.candidate, tolerance).await?;
            info!(
                owner_id = %owner,
                period = %period,
                step = ?planned.step,
                entry_no = %posted.entry.entry_no,
                amount = %posted.entry.totals.debit,
                "Closing entry posted"
            );
            touched.extend(posted.entry.touched_accounts());
            entry_numbers.push(posted.entry.entry_no);
        }
        touched.sort();
        touched.dedup();

        // VerifyZeroed
        let after = all_balances(&txn, owner).await?;
        let warnings: Vec<_> = ClosingVerifier::verify(&after, tolerance).into_iter().collect();

        txn.commit().await.map_err(storage_failure)?;

        if warnings.is_empty() {
            info!(
                owner_id = %owner,
                period = %period,
                net_income = %plan.net_income,
                "Period closed"
            );
        } else {
            warn!(
                owner_id = %owner,
                period = %period,
                ?warnings,
                "Period closed with temporary accounts still carrying a balance"
            );
        }

        Ok(ClosingOutcome {
            report: ClosingReport {
                run_id,
                period: period.clone(),
                closing_date,
                total_revenue: plan.total_revenue,
                total_expense: plan.total_expense,
                net_income: plan.net_income,
                entry_numbers,
                warnings,
            },
            touched,
        })
    }

    /// Lists the periods this owner has closed, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the query fails.
    pub async fn closed_periods(&self, owner: OwnerId) -> Result<Vec<PeriodLabel>, LedgerError> {
        closing_runs::Entity::find()
            .filter(closing_runs::Column::OwnerId.eq(owner.into_inner()))
            .order_by_asc(closing_runs::Column::PeriodLabel)
            .all(&self.db)
            .await
            .map_err(storage_failure)?
            .into_iter()
            .map(|run| {
                PeriodLabel::parse(&run.period_label)
                    .map_err(|e| LedgerError::StorageFailure(format!("corrupt closing run: {e}")))
            })
            .collect()
    }
}

async fn insert_run<C: ConnectionTrait>(
    conn: &C,
    run_id: ClosingRunId,
    owner: OwnerId,
    period: &PeriodLabel,
    closing_date: NaiveDate,
    plan: &ClosingPlan,
) -> Result<(), LedgerError> {
    let run = closing_runs::ActiveModel {
        id: Set(run_id.into_inner()),
        owner_id: Set(owner.into_inner()),
        period_label: Set(period.to_string()),
        closing_date: Set(closing_date),
        total_revenue: Set(plan.total_revenue),
        total_expense: Set(plan.total_expense),
        net_income: Set(plan.net_income),
        created_at: Set(Utc::now()),
    };

    closing_runs::Entity::insert(run)
        .exec_without_returning(conn)
        .await
        .map_err(|e| {
            unique_violation_or_storage(e, || LedgerError::PeriodAlreadyClosed(period.to_string()))
        })?;
    Ok(())
}
