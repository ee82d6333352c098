//! # Asset Keeper
//!
//! Sole owner of the ledger namespaces: balances, coin power, lock
//! schedules, allowances, coin stats and descriptions.
//!
//! Every public mutation follows validate-then-commit: all reads and checks
//! happen first and the resulting writes are staged in a [`WriteSet`], which
//! is applied only once nothing can fail any more.

mod approve;
mod bank;
mod locked;
mod power;
mod view;

use crate::adapters::codec;
use crate::domain::{
    approve_store_key, approve_sum_store_key, coin_desc_store_key, coin_locked_stat_store_key,
    coin_locked_store_key, coin_power_store_key, coin_stat_store_key, coin_store_key,
    AccountLockedCoins, ApproveData, AssetError, CoinDescription, CoinStat, LedgerConfig,
};
use crate::ports::{AccountEnsurer, KvStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{AccountId, Coins, Name};

/// The coin ledger.
pub struct AssetKeeper<S: KvStore, A: AccountEnsurer> {
    store: S,
    accounts: A,
    config: LedgerConfig,
}

impl<S: KvStore, A: AccountEnsurer> AssetKeeper<S, A> {
    pub fn new(store: S, accounts: A, config: LedgerConfig) -> Self {
        Self {
            store,
            accounts,
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Raw reads
    // =========================================================================

    fn read<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>, AssetError> {
        self.store
            .get(key)
            .map(|bytes| codec::decode(&bytes))
            .transpose()
    }

    pub(crate) fn get_coins_raw(&self, id: &AccountId) -> Result<Coins, AssetError> {
        Ok(self.read(&coin_store_key(id))?.unwrap_or_default())
    }

    pub(crate) fn get_power_raw(&self, id: &AccountId) -> Result<Coins, AssetError> {
        Ok(self.read(&coin_power_store_key(id))?.unwrap_or_default())
    }

    pub(crate) fn get_locked_sum(&self, id: &AccountId) -> Result<Coins, AssetError> {
        Ok(self.read(&coin_locked_store_key(id))?.unwrap_or_default())
    }

    pub(crate) fn get_locked_stat(&self, id: &AccountId) -> Result<AccountLockedCoins, AssetError> {
        Ok(self
            .read(&coin_locked_stat_store_key(id))?
            .unwrap_or_else(|| AccountLockedCoins {
                id: *id,
                lockeds: Vec::new(),
            }))
    }

    pub(crate) fn get_stat(&self, creator: &Name, symbol: &Name) -> Result<Option<CoinStat>, AssetError> {
        self.read(&coin_stat_store_key(creator, symbol))
    }

    pub(crate) fn get_description(
        &self,
        creator: &Name,
        symbol: &Name,
    ) -> Result<Option<CoinDescription>, AssetError> {
        self.read(&coin_desc_store_key(creator, symbol))
    }

    pub(crate) fn get_approve(
        &self,
        owner: &AccountId,
        spender: &AccountId,
    ) -> Result<Option<ApproveData>, AssetError> {
        self.read(&approve_store_key(owner, spender))
    }

    pub(crate) fn get_approve_sum_raw(&self, owner: &AccountId) -> Result<Coins, AssetError> {
        Ok(self.read(&approve_sum_store_key(owner))?.unwrap_or_default())
    }

    fn apply(&self, writes: WriteSet) {
        for (key, value) in writes.entries {
            match value {
                Some(bytes) => self.store.set(&key, bytes),
                None => self.store.delete(&key),
            }
        }
    }
}

// =============================================================================
// Staged writes
// =============================================================================

/// Writes collected during validation, applied atomically at the end.
///
/// Coin sets that become empty are deleted rather than stored.
#[derive(Default)]
pub(crate) struct WriteSet {
    entries: Vec<(Vec<u8>, Option<Vec<u8>>)>,
}

impl WriteSet {
    fn put<T: Serialize>(&mut self, key: Vec<u8>, value: &T) -> Result<(), AssetError> {
        self.entries.push((key, Some(codec::encode(value)?)));
        Ok(())
    }

    fn put_coins(&mut self, key: Vec<u8>, coins: &Coins) -> Result<(), AssetError> {
        if coins.is_zero() {
            self.delete(key);
            Ok(())
        } else {
            self.put(key, coins)
        }
    }

    fn delete(&mut self, key: Vec<u8>) {
        self.entries.push((key, None));
    }
}

/// `a + b`, mapping overflow to a ledger error.
pub(crate) fn add_coins(a: &Coins, b: &Coins) -> Result<Coins, AssetError> {
    a.checked_add(b)
        .ok_or_else(|| AssetError::Overflow(format!("{} + {}", a, b)))
}
