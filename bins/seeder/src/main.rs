//! Seeds the default chart of accounts.
//!
//! Runs pending migrations first, then registers the default accounts if the
//! registry is empty. Safe to run repeatedly.
//!
//! Usage: cargo run --bin seeder

use sea_orm_migration::MigratorTrait;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use neraca_db::migration::Migrator;
use neraca_db::{Ledger, connect_with};
use neraca_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "neraca=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    let ledger = Ledger::new(db, config.ledger)?;
    let inserted = ledger.seed_default_accounts().await?;
    if inserted == 0 {
        info!("Chart of accounts already present, nothing to seed");
    } else {
        info!(accounts = inserted, "Seeded default chart of accounts");
    }

    let accounts = ledger.list_accounts(&[]).await?;
    for account in &accounts {
        info!(
            code = %account.code,
            name = %account.name,
            account_type = %account.account_type,
            normal_balance = %account.normal_balance,
            "Account"
        );
    }

    Ok(())
}
