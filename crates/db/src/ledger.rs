//! Ledger facade.
//!
//! The single entry point the outer application calls. Every storage call is
//! bounded by the configured statement timeout, mutations invalidate the
//! balance cache after they commit, and every mutation is logged.

use std::future::Future;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tracing::{debug, warn};

use neraca_core::account::{Account, AccountCode, AccountType, NewAccount};
use neraca_core::closing::{ClosingAccounts, ClosingReport, PeriodLabel};
use neraca_core::ledger::{
    AccountBalance, BalanceCache, CandidateEntry, EntryKind, JournalEntry, JournalFilter,
    LedgerError,
};
use neraca_core::reports::{
    AccountLedgerReport, BalanceSheetReport, EquityAccounts, EquityStatementReport,
    IncomeStatementReport, PostClosingTrialBalance, ReportService, TrialBalanceKind,
    TrialBalanceReport,
};
use neraca_shared::LedgerConfig;
use neraca_shared::types::OwnerId;

use crate::repositories::{
    AccountRepository, BalanceRepository, ClosingRepository, JournalPage, JournalRepository,
    PostedEntry,
};

/// Ledger posting and period-closing engine.
#[derive(Clone)]
pub struct Ledger {
    config: LedgerConfig,
    closing_accounts: ClosingAccounts,
    cash_account: AccountCode,
    accounts: AccountRepository,
    journals: JournalRepository,
    balances: BalanceRepository,
    closings: ClosingRepository,
    cache: Option<BalanceCache>,
}

impl Ledger {
    /// Creates a ledger over `db`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCodeFormat` if a configured account code is malformed.
    pub fn new(db: DatabaseConnection, config: LedgerConfig) -> Result<Self, LedgerError> {
        let closing_accounts = ClosingAccounts {
            income_summary: AccountCode::parse(&config.income_summary_code)?,
            retained_earnings: AccountCode::parse(&config.retained_earnings_code)?,
        };
        let cash_account = AccountCode::parse(&config.cash_account_code)?;
        let cache = config
            .cache_enabled()
            .then(|| BalanceCache::new(config.balance_cache_capacity, config.balance_cache_ttl()));

        Ok(Self {
            closing_accounts,
            cash_account,
            accounts: AccountRepository::new(db.clone()),
            journals: JournalRepository::new(db.clone()),
            balances: BalanceRepository::new(db.clone()),
            closings: ClosingRepository::new(db),
            cache,
            config,
        })
    }

    /// Returns the ledger configuration.
    #[must_use]
    pub const fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ========== Account Registry ==========

    /// Registers an account.
    ///
    /// # Errors
    ///
    /// See [`AccountRepository::create`].
    pub async fn create_account(&self, input: NewAccount) -> Result<Account, LedgerError> {
        self.timed("create_account", self.accounts.create(input)).await
    }

    /// Deletes an account with no lines and a zero balance.
    ///
    /// # Errors
    ///
    /// See [`AccountRepository::delete`].
    pub async fn delete_account(&self, code: &str) -> Result<(), LedgerError> {
        let code = AccountCode::parse(code)?;
        self.timed("delete_account", self.accounts.delete(&code, self.config.tolerance))
            .await?;
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
        Ok(())
    }

    /// Lists accounts ordered by code, optionally restricted to some types.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` or `Timeout`.
    pub async fn list_accounts(&self, types: &[AccountType]) -> Result<Vec<Account>, LedgerError> {
        self.timed("list_accounts", self.accounts.list(types)).await
    }

    /// Seeds the default chart of accounts when the registry is empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` or `Timeout`.
    pub async fn seed_default_accounts(&self) -> Result<usize, LedgerError> {
        self.timed("seed_default_accounts", self.accounts.seed_defaults())
            .await
    }

    // ========== Posting Engine ==========

    /// Posts a journal entry of the candidate's kind.
    ///
    /// # Errors
    ///
    /// Returns a posting rule violation, `DuplicateEntryNumber`,
    /// `StorageFailure` or `Timeout`. Nothing is written on error.
    pub async fn post_entry(&self, candidate: CandidateEntry) -> Result<PostedEntry, LedgerError> {
        let posted = self
            .timed("post_entry", self.journals.post(candidate, self.config.tolerance))
            .await?;
        self.invalidate(posted.entry.owner, &posted.entry.touched_accounts());
        Ok(posted)
    }

    /// Posts an adjusting entry.
    ///
    /// # Errors
    ///
    /// Same as [`Ledger::post_entry`].
    pub async fn post_adjusting_entry(
        &self,
        candidate: CandidateEntry,
    ) -> Result<PostedEntry, LedgerError> {
        self.post_entry(candidate.with_kind(EntryKind::Adjusting)).await
    }

    /// Records cash paid out: debit `account_code`, credit the cash account.
    ///
    /// The entry number is `CP{payment_no}`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if `amount` is not positive or `account_code` is
    /// the cash account, otherwise the errors of [`Ledger::post_entry`].
    pub async fn post_cash_payment(
        &self,
        owner: OwnerId,
        payment_no: &str,
        date: NaiveDate,
        description: &str,
        account_code: &str,
        amount: Decimal,
    ) -> Result<PostedEntry, LedgerError> {
        let candidate = self
            .cash_candidate(
                EntryKind::CashPayment,
                owner,
                payment_no,
                date,
                description,
                account_code,
                amount,
            )?
            .debit(account_code, amount)
            .credit(self.cash_account.as_str(), amount);
        self.post_entry(candidate).await
    }

    /// Records cash received: debit the cash account, credit `account_code`.
    ///
    /// The entry number is `CR{receipt_no}`.
    ///
    /// # Errors
    ///
    /// Same as [`Ledger::post_cash_payment`].
    pub async fn post_cash_receipt(
        &self,
        owner: OwnerId,
        receipt_no: &str,
        date: NaiveDate,
        description: &str,
        account_code: &str,
        amount: Decimal,
    ) -> Result<PostedEntry, LedgerError> {
        let candidate = self
            .cash_candidate(
                EntryKind::CashReceipt,
                owner,
                receipt_no,
                date,
                description,
                account_code,
                amount,
            )?
            .debit(self.cash_account.as_str(), amount)
            .credit(account_code, amount);
        self.post_entry(candidate).await
    }

    /// Deletes an entry and all of its lines.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `StorageFailure` or `Timeout`.
    pub async fn delete_entry(&self, owner: OwnerId, entry_no: &str) -> Result<(), LedgerError> {
        let touched = self
            .timed("delete_entry", self.journals.delete(owner, entry_no))
            .await?;
        self.invalidate(owner, &touched);
        Ok(())
    }

    // ========== Journal Store ==========

    /// Finds one entry by number.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` or `Timeout`.
    pub async fn find_entry(
        &self,
        owner: OwnerId,
        entry_no: &str,
    ) -> Result<Option<JournalEntry>, LedgerError> {
        self.timed("find_entry", self.journals.find(owner, entry_no)).await
    }

    /// Lists entries ordered by `(date, entry_no)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` or `Timeout`.
    pub async fn journal(
        &self,
        owner: OwnerId,
        filter: &JournalFilter,
    ) -> Result<Vec<JournalEntry>, LedgerError> {
        self.timed("journal", self.journals.list(owner, filter)).await
    }

    /// Fetches one page of the journal.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` or `Timeout`.
    pub async fn journal_page(
        &self,
        owner: OwnerId,
        filter: &JournalFilter,
        page: u64,
        page_size: u64,
    ) -> Result<JournalPage, LedgerError> {
        self.timed("journal_page", self.journals.page(owner, filter, page, page_size))
            .await
    }

    /// Counts the owner's entries, optionally of one kind.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` or `Timeout`.
    pub async fn count_entries(
        &self,
        owner: OwnerId,
        kind: Option<EntryKind>,
    ) -> Result<u64, LedgerError> {
        self.timed("count_entries", self.journals.count(owner, kind)).await
    }

    // ========== Balance Calculator ==========

    /// Returns an account's balance in the owner scope.
    ///
    /// Accounts without lines, and codes that are not registered, have a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCodeFormat`, `StorageFailure` or `Timeout`.
    pub async fn balance_of(&self, owner: OwnerId, code: &str) -> Result<Decimal, LedgerError> {
        match self.account_balance(owner, code).await {
            Ok(balance) => Ok(balance.balance),
            Err(LedgerError::UnknownAccount(_)) => Ok(Decimal::ZERO),
            Err(e) => Err(e),
        }
    }

    /// Returns an account's totals and balance in the owner scope.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCodeFormat`, `UnknownAccount`, `StorageFailure` or `Timeout`.
    pub async fn account_balance(
        &self,
        owner: OwnerId,
        code: &str,
    ) -> Result<AccountBalance, LedgerError> {
        let code = AccountCode::parse(code)?;

        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(code.as_str(), owner)) {
            debug!(code = %code, owner_id = %owner, "Balance cache hit");
            return Ok(hit);
        }

        let read_epoch = self.cache.as_ref().map(BalanceCache::epoch);
        let balance = self
            .timed("account_balance", self.balances.account_balance(owner, &code))
            .await?;
        if let (Some(cache), Some(epoch)) = (&self.cache, read_epoch)
            && !cache.insert(owner, balance.clone(), epoch)
        {
            debug!(code = %code, owner_id = %owner, "Balance changed while read, not cached");
        }
        Ok(balance)
    }

    /// Trial balance of every account.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` or `Timeout`.
    pub async fn trial_balance(&self, owner: OwnerId) -> Result<TrialBalanceReport, LedgerError> {
        let balances = self.all_balances(owner).await?;
        Ok(ReportService::trial_balance(
            TrialBalanceKind::Unadjusted,
            &balances,
            self.config.tolerance,
        ))
    }

    /// Trial balance after adjusting entries.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` or `Timeout`.
    pub async fn adjusted_trial_balance(
        &self,
        owner: OwnerId,
    ) -> Result<TrialBalanceReport, LedgerError> {
        let balances = self.all_balances(owner).await?;
        Ok(ReportService::trial_balance(
            TrialBalanceKind::Adjusted,
            &balances,
            self.config.tolerance,
        ))
    }

    /// Trial balance of permanent accounts after closing.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` or `Timeout`.
    pub async fn post_closing_trial_balance(
        &self,
        owner: OwnerId,
    ) -> Result<PostClosingTrialBalance, LedgerError> {
        let balances = self.all_balances(owner).await?;
        Ok(ReportService::post_closing_trial_balance(
            &balances,
            self.config.tolerance,
        ))
    }

    /// Income statement.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` or `Timeout`.
    pub async fn income_statement(
        &self,
        owner: OwnerId,
    ) -> Result<IncomeStatementReport, LedgerError> {
        let balances = self.all_balances(owner).await?;
        Ok(ReportService::income_statement(&balances))
    }

    /// Balance sheet.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` or `Timeout`.
    pub async fn balance_sheet(&self, owner: OwnerId) -> Result<BalanceSheetReport, LedgerError> {
        let balances = self.all_balances(owner).await?;
        Ok(ReportService::balance_sheet(&balances, self.config.tolerance))
    }

    /// Statement of changes in equity.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` or `Timeout`.
    pub async fn equity_statement(
        &self,
        owner: OwnerId,
    ) -> Result<EquityStatementReport, LedgerError> {
        let balances = self.all_balances(owner).await?;
        Ok(ReportService::equity_statement(
            &balances,
            EquityAccounts {
                capital: &self.config.capital_code,
                retained_earnings: &self.config.retained_earnings_code,
                drawings: &self.config.drawings_code,
            },
        ))
    }

    /// Ledger of one account with running balances.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCodeFormat`, `UnknownAccount`, `StorageFailure` or `Timeout`.
    pub async fn account_ledger(
        &self,
        owner: OwnerId,
        code: &str,
    ) -> Result<AccountLedgerReport, LedgerError> {
        let code = AccountCode::parse(code)?;
        let account = self
            .timed("account_ledger", self.accounts.find(&code))
            .await?
            .ok_or_else(|| LedgerError::UnknownAccount(code.to_string()))?;
        let postings = self
            .timed("account_ledger", self.balances.postings(owner, &code))
            .await?;
        Ok(ReportService::account_ledger(&account, postings))
    }

    // ========== Period-Closing Engine ==========

    /// Closes a `YYYY-MM` period for `owner`, dating the entries `closing_date`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPeriodLabel`, `MissingClosingAccount`,
    /// `PeriodAlreadyClosed`, a posting error, `StorageFailure` or `Timeout`.
    /// On error nothing is written.
    pub async fn close_period(
        &self,
        owner: OwnerId,
        period_label: &str,
        closing_date: NaiveDate,
    ) -> Result<ClosingReport, LedgerError> {
        let period = PeriodLabel::parse(period_label)?;
        let outcome = self
            .timed(
                "close_period",
                self.closings.close_period(
                    owner,
                    &period,
                    closing_date,
                    &self.closing_accounts,
                    self.config.tolerance,
                ),
            )
            .await?;
        self.invalidate(owner, &outcome.touched);
        Ok(outcome.report)
    }

    /// Periods already closed for `owner`.
    ///
    /// # Errors
    ///
    /// Returns `StorageFailure` or `Timeout`.
    pub async fn closed_periods(&self, owner: OwnerId) -> Result<Vec<PeriodLabel>, LedgerError> {
        self.timed("closed_periods", self.closings.closed_periods(owner))
            .await
    }

    // ========== Helpers ==========

    async fn all_balances(&self, owner: OwnerId) -> Result<Vec<AccountBalance>, LedgerError> {
        self.timed("all_balances", self.balances.all_balances(owner))
            .await
    }

    #[allow(clippy::too_many_arguments)]
    fn cash_candidate(
        &self,
        kind: EntryKind,
        owner: OwnerId,
        number: &str,
        date: NaiveDate,
        description: &str,
        account_code: &str,
        amount: Decimal,
    ) -> Result<CandidateEntry, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidValue {
                field: "amount",
                value: amount.to_string(),
            });
        }
        if account_code.trim() == self.cash_account.as_str() {
            return Err(LedgerError::InvalidValue {
                field: "account_code",
                value: account_code.to_string(),
            });
        }
        let number = number.trim();
        if number.is_empty() {
            return Err(LedgerError::MissingField("entry_no"));
        }
        if description.trim().is_empty() {
            return Err(LedgerError::MissingField("description"));
        }

        Ok(CandidateEntry::new(owner, kind.tag_entry_no(number), date, description.trim())
            .with_kind(kind))
    }

    fn invalidate(&self, owner: OwnerId, codes: &[AccountCode]) {
        if let Some(cache) = &self.cache {
            cache.invalidate(owner, codes);
        }
    }

    async fn timed<T, F>(&self, operation: &'static str, fut: F) -> Result<T, LedgerError>
    where
        F: Future<Output = Result<T, LedgerError>>,
    {
        if let Ok(result) = tokio::time::timeout(self.config.statement_timeout(), fut).await {
            result
        } else {
            warn!(
                operation,
                timeout_ms = self.config.statement_timeout_ms,
                "Ledger operation timed out"
            );
            Err(LedgerError::Timeout(self.config.statement_timeout_ms))
        }
    }
}
