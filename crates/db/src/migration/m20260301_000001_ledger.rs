//! Ledger schema migration.
//!
//! Creates the chart of accounts, journal headers and lines, and the closing
//! run register. Built with the schema builder so the same migration runs on
//! PostgreSQL and SQLite; only the money column type differs per backend.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        // ============================================================
        // PART 1: CHART OF ACCOUNTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Code).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Accounts::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Accounts::AccountType).string_len(16).not_null())
                    .col(ColumnDef::new(Accounts::NormalBalance).string_len(8).not_null())
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: JOURNAL ENTRIES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Journals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Journals::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Journals::EntryNo).string_len(64).not_null())
                    .col(ColumnDef::new(Journals::Date).date().not_null())
                    .col(ColumnDef::new(Journals::Description).text().not_null())
                    .col(ColumnDef::new(Journals::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Journals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Entry numbers are unique per owner; concurrent duplicates lose here.
        manager
            .create_index(
                Index::create()
                    .name("uq_journals_owner_entry_no")
                    .table(Journals::Table)
                    .col(Journals::OwnerId)
                    .col(Journals::EntryNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journals_owner_date")
                    .table(Journals::Table)
                    .col(Journals::OwnerId)
                    .col(Journals::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalDetails::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(JournalDetails::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(JournalDetails::JournalId).uuid().not_null())
                    .col(ColumnDef::new(JournalDetails::LineNo).integer().not_null())
                    .col(ColumnDef::new(JournalDetails::AccountCode).string_len(32).not_null())
                    .col(money(JournalDetails::Debit, backend))
                    .col(money(JournalDetails::Credit, backend))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_details_journal")
                            .from(JournalDetails::Table, JournalDetails::JournalId)
                            .to(Journals::Table, Journals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_journal_details_account")
                            .from(JournalDetails::Table, JournalDetails::AccountCode)
                            .to(Accounts::Table, Accounts::Code)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_details_journal")
                    .table(JournalDetails::Table)
                    .col(JournalDetails::JournalId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_journal_details_account")
                    .table(JournalDetails::Table)
                    .col(JournalDetails::AccountCode)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: CLOSING RUNS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(ClosingRuns::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ClosingRuns::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ClosingRuns::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(ClosingRuns::PeriodLabel).string_len(16).not_null())
                    .col(ColumnDef::new(ClosingRuns::ClosingDate).date().not_null())
                    .col(money(ClosingRuns::TotalRevenue, backend))
                    .col(money(ClosingRuns::TotalExpense, backend))
                    .col(money(ClosingRuns::NetIncome, backend))
                    .col(
                        ColumnDef::new(ClosingRuns::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // A period closes once per owner.
        manager
            .create_index(
                Index::create()
                    .name("uq_closing_runs_owner_period")
                    .table(ClosingRuns::Table)
                    .col(ClosingRuns::OwnerId)
                    .col(ClosingRuns::PeriodLabel)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClosingRuns::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalDetails::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Journals::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

/// Two-digit money column: NUMERIC(19, 2), or the widest REAL SQLite accepts.
fn money<T: IntoIden>(column: T, backend: DbBackend) -> ColumnDef {
    let mut def = ColumnDef::new(column);
    match backend {
        DbBackend::Sqlite => def.decimal_len(16, 2),
        _ => def.decimal_len(19, 2),
    };
    def.not_null();
    def
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Code,
    Name,
    AccountType,
    NormalBalance,
}

#[derive(DeriveIden)]
enum Journals {
    Table,
    Id,
    EntryNo,
    Date,
    Description,
    OwnerId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JournalDetails {
    Table,
    Id,
    JournalId,
    LineNo,
    AccountCode,
    Debit,
    Credit,
}

#[derive(DeriveIden)]
enum ClosingRuns {
    Table,
    Id,
    OwnerId,
    PeriodLabel,
    ClosingDate,
    TotalRevenue,
    TotalExpense,
    NetIncome,
    CreatedAt,
}
