//! Coin power: a per-account balance that cannot be spent directly.

use super::{add_coins, AssetKeeper, WriteSet};
use crate::domain::{coin_power_store_key, coin_stat_store_key, coin_store_key, AssetError};
use crate::ports::{AccountEnsurer, KvStore};
use shared_types::{AccountId, BlockContext, Coin, Coins};
use tracing::debug;

impl<S: KvStore, A: AccountEnsurer> AssetKeeper<S, A> {
    /// Mint `amount` as coin power of `id`, returning the new power.
    ///
    /// Supply is checked and raised exactly as for [`AssetKeeper::issue`].
    pub fn issue_coin_power(
        &self,
        ctx: &BlockContext,
        id: &AccountId,
        amount: &Coins,
    ) -> Result<Coins, AssetError> {
        let mut writes = WriteSet::default();
        for coin in amount {
            let stat = self
                .issue_coin_stat(ctx, coin)
                .map_err(|e| e.wrap(format!("issue {} state error", coin)))?;
            writes.put(coin_stat_store_key(&stat.creator, &stat.symbol), &stat)?;
        }

        let power = add_coins(&self.get_power_raw(id)?, amount)?;
        writes.put_coins(coin_power_store_key(id), &power)?;
        self.apply(writes);

        debug!(module = "asset", height = ctx.height, %id, %amount, "issue coin power");
        Ok(power)
    }

    /// Destroy `amount` of the coin power of `id`, returning the new power.
    pub fn burn_coin_power(
        &self,
        ctx: &BlockContext,
        id: &AccountId,
        amount: &Coins,
    ) -> Result<Coins, AssetError> {
        let mut writes = WriteSet::default();
        for coin in amount {
            let stat = self
                .burn_coin_stat(coin)
                .map_err(|e| e.wrap(format!("burn {} state error", coin)))?;
            writes.put(coin_stat_store_key(&stat.creator, &stat.symbol), &stat)?;
        }

        let current = self.get_power_raw(id)?;
        let power = current.safe_sub(amount).ok_or_else(|| {
            AssetError::CoinNoEnough(format!("power {} < {}", current, amount))
        })?;
        writes.put_coins(coin_power_store_key(id), &power)?;
        self.apply(writes);

        debug!(module = "asset", height = ctx.height, %id, %amount, "burn coin power");
        Ok(power)
    }

    /// Move coin power between accounts.
    pub fn send_coin_power(
        &self,
        ctx: &BlockContext,
        from: &AccountId,
        to: &AccountId,
        amount: &Coins,
    ) -> Result<(), AssetError> {
        if from.is_empty() {
            return Err(AssetError::FromAccountEmpty);
        }
        if to.is_empty() {
            return Err(AssetError::ToAccountEmpty);
        }

        let from_power = self.get_power_raw(from)?;
        let from_after = from_power.safe_sub(amount).ok_or_else(|| {
            AssetError::CoinNoEnough(format!("power {} < {}", from_power, amount))
        })?;

        if from == to || amount.is_zero() {
            return Ok(());
        }

        let to_after = add_coins(&self.get_power_raw(to)?, amount)?;

        self.accounts
            .ensure_account(ctx, to)
            .map_err(|e| e.wrap(format!("ensure account {}", to)))?;

        let mut writes = WriteSet::default();
        writes.put_coins(coin_power_store_key(from), &from_after)?;
        writes.put_coins(coin_power_store_key(to), &to_after)?;
        self.apply(writes);

        debug!(module = "asset", %from, %to, %amount, "send coin power");
        Ok(())
    }

    /// Debit `amount` from the usable balance of `from` and credit it to the
    /// coin power of `to`. Supply is unchanged.
    pub fn coins_to_power(
        &self,
        ctx: &BlockContext,
        from: &AccountId,
        to: &AccountId,
        amount: &Coins,
    ) -> Result<(), AssetError> {
        if from.is_empty() {
            return Err(AssetError::FromAccountEmpty);
        }
        if to.is_empty() {
            return Err(AssetError::ToAccountEmpty);
        }
        if amount.is_zero() {
            return Ok(());
        }

        let balance = self.get_coins_raw(from)?;
        let balance_after = balance.safe_sub(amount).ok_or_else(|| {
            AssetError::CoinNoEnough(format!("coins to power {} from {}", amount, from))
        })?;
        self.check_usable(from, amount, &balance, false)
            .map_err(|e| e.wrap("coins to power"))?;

        let power_after = add_coins(&self.get_power_raw(to)?, amount)?;

        self.accounts
            .ensure_account(ctx, to)
            .map_err(|e| e.wrap(format!("ensure account {}", to)))?;

        let mut writes = WriteSet::default();
        writes.put_coins(coin_store_key(from), &balance_after)?;
        writes.put_coins(coin_power_store_key(to), &power_after)?;
        self.apply(writes);

        debug!(module = "asset", %from, %to, %amount, "coins to power");
        Ok(())
    }

    /// Convert coin power of `id` back into its own balance, returning the
    /// new balance. Supply is unchanged.
    pub fn exercise_coin_power(
        &self,
        ctx: &BlockContext,
        id: &AccountId,
        amount: &Coin,
    ) -> Result<Coins, AssetError> {
        let balance = self.get_coins_raw(id)?;
        if amount.is_zero() {
            return Ok(balance);
        }

        let exercised = Coins::from_coin(amount.clone());
        let current = self.get_power_raw(id)?;
        let power_after = current.safe_sub(&exercised).ok_or_else(|| {
            AssetError::CoinNoEnough(format!("power {} < {}", current, amount))
        })?;
        let balance_after = add_coins(&balance, &exercised)?;

        let mut writes = WriteSet::default();
        writes.put_coins(coin_power_store_key(id), &power_after)?;
        writes.put_coins(coin_store_key(id), &balance_after)?;
        self.apply(writes);

        debug!(module = "asset", height = ctx.height, %id, %amount, "exercise coin power");
        Ok(balance_after)
    }

    /// Charge `fee` from `payer` into the fee collector's coin power.
    pub fn pay_fee(
        &self,
        ctx: &BlockContext,
        payer: &AccountId,
        fee: &Coins,
    ) -> Result<(), AssetError> {
        let collector = self.config.fee_collector;
        self.coins_to_power(ctx, payer, &collector, fee)
            .map_err(|e| e.wrap("pay fee"))
    }
}
