//! Read-through cache for derived account balances using Moka.
//!
//! Entries are keyed by `(account_code, owner)` and expire after a fixed
//! time-to-live. Every write that touches an account must invalidate that key
//! after its transaction commits. Invalidation also advances an epoch, and a
//! balance read before the latest invalidation is never stored.
//!
//! Invalidation only reaches the process holding the cache. Writes made
//! through another process become visible once the entry expires.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use moka::sync::Cache;

use neraca_shared::types::OwnerId;

use super::balance::AccountBalance;
use crate::account::AccountCode;

/// Cache of account balances per owner.
///
/// Thread-safe and cheap to clone. Clones share entries and epoch.
#[derive(Clone)]
pub struct BalanceCache {
    cache: Cache<(String, OwnerId), Arc<AccountBalance>>,
    epoch: Arc<Mutex<u64>>,
}

impl BalanceCache {
    /// Creates a cache holding at most `max_capacity` balances, each for at most `ttl`.
    #[must_use]
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
            epoch: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns a cached balance.
    #[must_use]
    pub fn get(&self, code: &str, owner: OwnerId) -> Option<AccountBalance> {
        self.cache
            .get(&(code.to_string(), owner))
            .map(|balance| (*balance).clone())
    }

    /// Current invalidation epoch. Take it before reading the balance from storage.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        *self.lock_epoch()
    }

    /// Stores a balance read at `read_epoch`.
    ///
    /// Returns false, storing nothing, if an invalidation happened since.
    pub fn insert(&self, owner: OwnerId, balance: AccountBalance, read_epoch: u64) -> bool {
        let epoch = self.lock_epoch();
        if *epoch != read_epoch {
            return false;
        }
        self.cache.insert((balance.code.clone(), owner), Arc::new(balance));
        true
    }

    /// Drops the cached balances of `codes` for `owner`.
    pub fn invalidate<'a>(
        &self,
        owner: OwnerId,
        codes: impl IntoIterator<Item = &'a AccountCode>,
    ) {
        let mut epoch = self.lock_epoch();
        *epoch += 1;
        for code in codes {
            self.cache.invalidate(&(code.to_string(), owner));
        }
    }

    /// Drops every cached balance. Used when an account leaves the registry.
    pub fn invalidate_all(&self) {
        let mut epoch = self.lock_epoch();
        *epoch += 1;
        self.cache.invalidate_all();
    }

    // The guarded value is a plain counter, so a poisoned lock is still usable.
    fn lock_epoch(&self) -> MutexGuard<'_, u64> {
        self.epoch.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{Account, AccountType};
    use rust_decimal_macros::dec;

    const TTL: Duration = Duration::from_secs(60);

    fn cash_balance() -> AccountBalance {
        let account = Account {
            code: AccountCode::parse("1-1000").unwrap(),
            name: "Cash".into(),
            account_type: AccountType::Asset,
            normal_balance: AccountType::Asset.normal_balance(),
        };
        AccountBalance::from_totals(&account, dec!(100), dec!(40))
    }

    #[test]
    fn test_insert_and_get() {
        let cache = BalanceCache::new(10, TTL);
        let owner = OwnerId::new();
        assert!(cache.insert(owner, cash_balance(), cache.epoch()));

        let hit = cache.get("1-1000", owner).unwrap();
        assert_eq!(hit.balance, dec!(60));
        assert!(cache.get("1-1000", OwnerId::new()).is_none());
    }

    #[test]
    fn test_invalidate_touched_accounts() {
        let cache = BalanceCache::new(10, TTL);
        let owner = OwnerId::new();
        cache.insert(owner, cash_balance(), cache.epoch());

        let code = AccountCode::parse("1-1000").unwrap();
        cache.invalidate(owner, [&code]);
        assert!(cache.get("1-1000", owner).is_none());
    }

    #[test]
    fn test_invalidate_all() {
        let cache = BalanceCache::new(10, TTL);
        let (first, second) = (OwnerId::new(), OwnerId::new());
        cache.insert(first, cash_balance(), cache.epoch());
        cache.insert(second, cash_balance(), cache.epoch());

        cache.invalidate_all();
        assert!(cache.get("1-1000", first).is_none());
        assert!(cache.get("1-1000", second).is_none());
    }

    #[test]
    fn test_read_before_invalidation_is_not_stored() {
        let cache = BalanceCache::new(10, TTL);
        let owner = OwnerId::new();
        let code = AccountCode::parse("1-1000").unwrap();

        let read_epoch = cache.epoch();
        // A write commits and invalidates while the balance is being read.
        cache.invalidate(owner, [&code]);

        assert!(!cache.insert(owner, cash_balance(), read_epoch));
        assert!(cache.get("1-1000", owner).is_none());
        assert!(cache.insert(owner, cash_balance(), cache.epoch()));
    }

    #[test]
    fn test_entries_expire_after_ttl() {
        let cache = BalanceCache::new(10, Duration::from_millis(50));
        let owner = OwnerId::new();
        cache.insert(owner, cash_balance(), cache.epoch());
        assert!(cache.get("1-1000", owner).is_some());

        std::thread::sleep(Duration::from_millis(120));
        assert!(cache.get("1-1000", owner).is_none());
    }
}
