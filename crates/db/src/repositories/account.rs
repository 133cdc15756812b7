//! Account repository for chart of accounts database operations.

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};

use neraca_core::account::{
    Account, AccountCode, AccountRules, AccountType, NewAccount, default_chart,
};
use neraca_core::ledger::LedgerError;

use super::balance::BalanceRepository;
use super::error::{storage_failure, unique_violation_or_storage};
use crate::entities::{accounts, journal_details, sea_orm_active_enums};

/// Account repository for chart of accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns a validation error from `AccountRules`, `DuplicateAccountCode`
    /// if the code is taken, or `StorageFailure`.
    pub async fn create(&self, input: NewAccount) -> Result<Account, LedgerError> {
        let account = AccountRules::validate_new(input)?;

        if self.find(&account.code).await?.is_some() {
            return Err(LedgerError::DuplicateAccountCode(account.code.to_string()));
        }

        insert_account(&self.db, &account).await?;
        info!(code = %account.code, account_type = %account.account_type, "Account created");
        Ok(account)
    }

    /// Finds an account by code.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the query fails.
    pub async fn find(&self, code: &AccountCode) -> Result<Option<Account>, LedgerError> {
        find_account(&self.db, code.as_str()).await
    }

    /// Lists accounts ordered by code.
    ///
    /// An empty `types` filter lists every account.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the query fails.
    pub async fn list(&self, types: &[AccountType]) -> Result<Vec<Account>, LedgerError> {
        list_accounts(&self.db, types).await
    }

    /// Deletes an account with no journal lines and a zero balance.
    ///
    /// The check and the delete run in one transaction so a concurrent
    /// posting cannot slip a line in between.
    ///
    /// # Errors
    ///
    /// Returns `UnknownAccount`, `AccountHasTransactions`, `AccountHasBalance`
    /// or `StorageFailure`.
    pub async fn delete(&self, code: &AccountCode, tolerance: Decimal) -> Result<(), LedgerError> {
        let txn = self.db.begin().await.map_err(storage_failure)?;

        let account = find_account(&txn, code.as_str())
            .await?
            .ok_or_else(|| LedgerError::UnknownAccount(code.to_string()))?;

        let line_count = journal_details::Entity::find()
            .filter(journal_details::Column::AccountCode.eq(code.as_str()))
            .count(&txn)
            .await
            .map_err(storage_failure)?;
        let (debit, credit) = BalanceRepository::global_totals(&txn, code.as_str()).await?;
        let balance = account.normal_balance.signed(debit, credit);

        AccountRules::validate_deletion(code, line_count, balance, tolerance)?;

        accounts::Entity::delete_by_id(code.as_str().to_string())
            .exec(&txn)
            .await
            .map_err(storage_failure)?;
        txn.commit().await.map_err(storage_failure)?;

        info!(code = %code, "Account deleted");
        Ok(())
    }

    /// Seeds the default chart of accounts.
    ///
    /// Does nothing if any account already exists. Returns the number of
    /// accounts inserted.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` if the insert fails.
    pub async fn seed_defaults(&self) -> Result<usize, LedgerError> {
        let existing = accounts::Entity::find()
            .count(&self.db)
            .await
            .map_err(storage_failure)?;
        if existing > 0 {
            debug!(existing, "Chart of accounts already present, skipping seed");
            return Ok(0);
        }

        let chart = default_chart()
            .into_iter()
            .map(AccountRules::validate_new)
            .collect::<Result<Vec<_>, _>>()?;

        let txn = self.db.begin().await.map_err(storage_failure)?;
        for account in &chart {
            insert_account(&txn, account).await?;
        }
        txn.commit().await.map_err(storage_failure)?;

        info!(count = chart.len(), "Seeded default chart of accounts");
        Ok(chart.len())
    }
}

/// Converts a stored row to the domain account.
pub(crate) fn to_domain(model: accounts::Model) -> Result<Account, LedgerError> {
    Ok(Account {
        code: AccountCode::parse(&model.code)
            .map_err(|e| LedgerError::StorageFailure(format!("corrupt account row: {e}")))?,
        name: model.name,
        account_type: model.account_type.into(),
        normal_balance: model.normal_balance.into(),
    })
}

pub(crate) async fn find_account<C: ConnectionTrait>(
    conn: &C,
    code: &str,
) -> Result<Option<Account>, LedgerError> {
    accounts::Entity::find_by_id(code.to_string())
        .one(conn)
        .await
        .map_err(storage_failure)?
        .map(to_domain)
        .transpose()
}

pub(crate) async fn list_accounts<C: ConnectionTrait>(
    conn: &C,
    types: &[AccountType],
) -> Result<Vec<Account>, LedgerError> {
    let mut query = accounts::Entity::find().order_by_asc(accounts::Column::Code);
    if !types.is_empty() {
        let types: Vec<sea_orm_active_enums::AccountType> =
            types.iter().copied().map(Into::into).collect();
        query = query.filter(accounts::Column::AccountType.is_in(types));
    }

    query
        .all(conn)
        .await
        .map_err(storage_failure)?
        .into_iter()
        .map(to_domain)
        .collect()
}

async fn insert_account<C: ConnectionTrait>(
    conn: &C,
    account: &Account,
) -> Result<(), LedgerError> {
    let model = accounts::ActiveModel {
        code: Set(account.code.to_string()),
        name: Set(account.name.clone()),
        account_type: Set(account.account_type.into()),
        normal_balance: Set(account.normal_balance.into()),
    };

    accounts::Entity::insert(model)
        .exec_without_returning(conn)
        .await
        .map_err(|e| {
            unique_violation_or_storage(e, || {
                LedgerError::DuplicateAccountCode(account.code.to_string())
            })
        })?;
    Ok(())
}
