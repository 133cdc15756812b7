//! Application configuration management.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger posting and closing configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger configuration.
///
/// The account codes name the well-known equity and cash accounts the
/// closing procedure and the cash shortcuts post against.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Clearing account used while closing temporary accounts.
    #[serde(default = "default_income_summary_code")]
    pub income_summary_code: String,
    /// Equity account that receives net income at period close.
    #[serde(default = "default_retained_earnings_code")]
    pub retained_earnings_code: String,
    /// Owner's capital account used by the statement of changes in equity.
    #[serde(default = "default_capital_code")]
    pub capital_code: String,
    /// Owner's drawings account used by the statement of changes in equity.
    #[serde(default = "default_drawings_code")]
    pub drawings_code: String,
    /// Cash account used by cash payments and cash receipts.
    #[serde(default = "default_cash_code")]
    pub cash_account_code: String,
    /// Maximum difference between debits and credits still treated as balanced.
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
    /// Upper bound for a single storage-touching ledger call, in milliseconds.
    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,
    /// Capacity of the balance cache. Zero disables caching.
    ///
    /// Only enable it when a single process writes to the database: another
    /// process's writes stay invisible until cached entries expire.
    #[serde(default)]
    pub balance_cache_capacity: u64,
    /// Lifetime of a cached balance, in seconds.
    #[serde(default = "default_balance_cache_ttl_secs")]
    pub balance_cache_ttl_secs: u64,
}

fn default_income_summary_code() -> String {
    "3-3200".to_string()
}

fn default_retained_earnings_code() -> String {
    "3-3100".to_string()
}

fn default_capital_code() -> String {
    "3-3000".to_string()
}

fn default_drawings_code() -> String {
    "3-3300".to_string()
}

fn default_cash_code() -> String {
    "1-1000".to_string()
}

fn default_tolerance() -> Decimal {
    crate::types::DEFAULT_TOLERANCE
}

fn default_statement_timeout_ms() -> u64 {
    5000
}

fn default_balance_cache_ttl_secs() -> u64 {
    30
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            income_summary_code: default_income_summary_code(),
            retained_earnings_code: default_retained_earnings_code(),
            capital_code: default_capital_code(),
            drawings_code: default_drawings_code(),
            cash_account_code: default_cash_code(),
            tolerance: default_tolerance(),
            statement_timeout_ms: default_statement_timeout_ms(),
            balance_cache_capacity: 0,
            balance_cache_ttl_secs: default_balance_cache_ttl_secs(),
        }
    }
}

impl LedgerConfig {
    /// Returns the per-call timeout as a `Duration`.
    #[must_use]
    pub const fn statement_timeout(&self) -> Duration {
        Duration::from_millis(self.statement_timeout_ms)
    }

    /// Returns the balance cache time-to-live as a `Duration`.
    #[must_use]
    pub const fn balance_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.balance_cache_ttl_secs)
    }

    /// Returns true if the balance cache should be built.
    #[must_use]
    pub const fn cache_enabled(&self) -> bool {
        self.balance_cache_capacity > 0
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("NERACA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ledger_config_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.income_summary_code, "3-3200");
        assert_eq!(config.retained_earnings_code, "3-3100");
        assert_eq!(config.cash_account_code, "1-1000");
        assert_eq!(config.tolerance, dec!(0.01));
        assert_eq!(config.statement_timeout(), Duration::from_secs(5));
        assert!(!config.cache_enabled());
        assert_eq!(config.balance_cache_ttl(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("NERACA__DATABASE__URL", Some("sqlite::memory:")),
                ("NERACA__LEDGER__STATEMENT_TIMEOUT_MS", Some("250")),
                ("NERACA__LEDGER__RETAINED_EARNINGS_CODE", Some("3-3900")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "sqlite::memory:");
                assert_eq!(config.database.max_connections, 10);
                assert_eq!(config.ledger.statement_timeout_ms, 250);
                assert_eq!(config.ledger.retained_earnings_code, "3-3900");
                assert_eq!(config.ledger.income_summary_code, "3-3200");
            },
        );
    }

    #[test]
    fn test_load_without_database_url_fails() {
        temp_env::with_var_unset("NERACA__DATABASE__URL", || {
            assert!(AppConfig::load().is_err());
        });
    }
}
