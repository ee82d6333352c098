//! Read-only queries over the ledger namespaces.

use super::AssetKeeper;
use crate::adapters::codec;
use crate::domain::{account_id_from_key, AssetError, CoinDescription, CoinStat, KeySpace};
use crate::ports::{AccountEnsurer, KvStore};
use shared_types::{coin_denom, AccountId, Coin, Coins, Name};

impl<S: KvStore, A: AccountEnsurer> AssetKeeper<S, A> {
    pub fn get_coins(&self, account: &AccountId) -> Result<Coins, AssetError> {
        self.get_coins_raw(account)
    }

    /// Balance of `account` in `creator/symbol` (zero when absent).
    pub fn get_coin(
        &self,
        account: &AccountId,
        creator: &Name,
        symbol: &Name,
    ) -> Result<Coin, AssetError> {
        let coins = self
            .get_coins_raw(account)
            .map_err(|e| e.wrap(format!("get coin {} {}/{}", account, creator, symbol)))?;
        let denom = coin_denom(&creator.to_string(), &symbol.to_string());
        let amount = coins.amount_of(&denom);
        Ok(Coin::new(denom, amount))
    }

    pub fn get_coin_powers(&self, account: &AccountId) -> Result<Coins, AssetError> {
        self.get_power_raw(account)
    }

    pub fn get_coin_power(
        &self,
        account: &AccountId,
        creator: &Name,
        symbol: &Name,
    ) -> Result<Coin, AssetError> {
        let denom = coin_denom(&creator.to_string(), &symbol.to_string());
        self.get_coin_power_by_denom(account, &denom)
    }

    pub fn get_coin_power_by_denom(
        &self,
        account: &AccountId,
        denom: &str,
    ) -> Result<Coin, AssetError> {
        let powers = self.get_power_raw(account)?;
        Ok(Coin::new(denom, powers.amount_of(denom)))
    }

    pub fn get_coin_desc(
        &self,
        creator: &Name,
        symbol: &Name,
    ) -> Result<Option<CoinDescription>, AssetError> {
        self.get_description(creator, symbol)
    }

    /// Supply policy of `creator/symbol`; `CoinNoExit` when never created.
    pub fn get_coin_stat(&self, creator: &Name, symbol: &Name) -> Result<CoinStat, AssetError> {
        self.get_stat(creator, symbol)?.ok_or_else(|| {
            AssetError::CoinNoExit(coin_denom(&creator.to_string(), &symbol.to_string()))
        })
    }

    /// Current supply of every created coin.
    pub fn get_coins_total_supply(&self) -> Result<Coins, AssetError> {
        let supplies = self
            .store
            .iter_prefix(&KeySpace::CoinStat.prefix())
            .into_iter()
            .map(|(_, bytes)| codec::decode::<CoinStat>(&bytes).map(|stat| stat.supply))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Coins::new(supplies))
    }

    pub fn get_coin_total_supply(&self, creator: &Name, symbol: &Name) -> Result<Coin, AssetError> {
        self.get_coin_stat(creator, symbol)
            .map(|stat| stat.supply)
            .map_err(|e| e.wrap(format!("get coin total supply {}/{}", creator, symbol)))
    }

    /// Visit every non-empty balance in key order until `cb` returns `true`.
    pub fn iterate_all_coins<F>(&self, cb: F) -> Result<(), AssetError>
    where
        F: FnMut(AccountId, Coins) -> bool,
    {
        self.iterate_account_coins(KeySpace::Coin, cb)
    }

    /// Visit every non-empty coin power in key order until `cb` returns `true`.
    pub fn iterate_all_coin_powers<F>(&self, cb: F) -> Result<(), AssetError>
    where
        F: FnMut(AccountId, Coins) -> bool,
    {
        self.iterate_account_coins(KeySpace::CoinPower, cb)
    }

    fn iterate_account_coins<F>(&self, space: KeySpace, mut cb: F) -> Result<(), AssetError>
    where
        F: FnMut(AccountId, Coins) -> bool,
    {
        for (key, bytes) in self.store.iter_prefix(&space.prefix()) {
            let id = account_id_from_key(space, &key)?;
            let coins: Coins = codec::decode(&bytes)?;
            if cb(id, coins) {
                break;
            }
        }
        Ok(())
    }
}
