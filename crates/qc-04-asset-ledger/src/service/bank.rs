//! Coin creation, issuance, burning and transfers.

use super::{add_coins, AssetKeeper, WriteSet};
use crate::domain::{
    coin_accounts_from_denom, coin_desc_store_key, coin_stat_store_key, coin_store_key,
    AssetError, CoinDescription, CoinOptions, CoinStat,
};
use crate::ports::{AccountEnsurer, KvStore};
use shared_types::{coin_denom, validate_denom, AccountId, BlockContext, Coin, Coins, Name};
use tracing::debug;

impl<S: KvStore, A: AccountEnsurer> AssetKeeper<S, A> {
    /// Register a new coin type `creator/symbol`.
    pub fn create(
        &self,
        ctx: &BlockContext,
        creator: &Name,
        symbol: &Name,
        max_supply: Coin,
        opts: &CoinOptions,
        desc: &[u8],
    ) -> Result<(), AssetError> {
        let denom = coin_denom(&creator.to_string(), &symbol.to_string());

        if self.get_stat(creator, symbol)?.is_some() {
            return Err(AssetError::HasCreated(denom));
        }

        validate_denom(&denom).map_err(|_| AssetError::Denom(denom.clone()))?;
        if max_supply.denom != denom {
            return Err(AssetError::Denom(format!(
                "max supply denom {} should be {}",
                max_supply.denom, denom
            )));
        }

        if desc.len() > self.config.max_description_len {
            return Err(AssetError::DescriptorTooLarge {
                len: desc.len(),
                max: self.config.max_description_len,
            });
        }

        let mut stat = CoinStat::new(*creator, *symbol, ctx.height, max_supply);
        stat.set_opts(opts).map_err(|e| e.wrap("set stat opt"))?;

        let description = CoinDescription {
            symbol: *symbol,
            creator: *creator,
            description: desc.to_vec(),
        };

        let mut writes = WriteSet::default();
        writes.put(coin_stat_store_key(creator, symbol), &stat)?;
        writes.put(coin_desc_store_key(creator, symbol), &description)?;
        self.apply(writes);

        debug!(
            module = "asset",
            %denom,
            max_supply = %stat.max_supply,
            can_issue = stat.can_issue,
            issue_to_height = stat.issue_to_height,
            "coin created"
        );
        Ok(())
    }

    /// Mint `amount` into the creator's balance, subject to the supply limit.
    pub fn issue(
        &self,
        ctx: &BlockContext,
        creator: &Name,
        symbol: &Name,
        amount: Coin,
    ) -> Result<(), AssetError> {
        let denom = coin_denom(&creator.to_string(), &symbol.to_string());
        if amount.denom != denom {
            return Err(AssetError::Denom(format!("amount denom {} should be {}", amount.denom, denom)));
        }

        let stat = self.issue_coin_stat(ctx, &amount)?;

        let creator_account = AccountId::from(*creator);
        let balance = self.get_coins_raw(&creator_account)?;
        let balance = add_coins(&balance, &Coins::from_coin(amount.clone()))?;

        let mut writes = WriteSet::default();
        writes.put(coin_stat_store_key(&stat.creator, &stat.symbol), &stat)?;
        writes.put_coins(coin_store_key(&creator_account), &balance)?;
        self.apply(writes);

        debug!(module = "asset", %amount, supply = %stat.supply, "coin issued");
        Ok(())
    }

    /// Destroy `amount` from the usable balance of `id`.
    pub fn burn(&self, ctx: &BlockContext, id: &AccountId, amount: Coin) -> Result<(), AssetError> {
        let stat = self.burn_coin_stat(&amount)?;
        if !stat.can_burn {
            return Err(AssetError::CoinCannotBeBurn(amount.denom));
        }

        let burned = Coins::from_coin(amount.clone());
        let balance = self.get_coins_raw(id)?;
        let remaining = balance
            .safe_sub(&burned)
            .ok_or_else(|| AssetError::CoinNoEnough(format!("burn {} from {}", amount, id)))?;

        self.check_usable(id, &burned, &balance, false)
            .map_err(|e| e.wrap("burn"))?;

        let mut writes = WriteSet::default();
        writes.put(coin_stat_store_key(&stat.creator, &stat.symbol), &stat)?;
        writes.put_coins(coin_store_key(id), &remaining)?;
        self.apply(writes);

        debug!(module = "asset", height = ctx.height, %id, %amount, "coin burned");
        Ok(())
    }

    pub fn transfer(
        &self,
        ctx: &BlockContext,
        from: &AccountId,
        to: &AccountId,
        amount: &Coins,
    ) -> Result<(), AssetError> {
        self.transfer_detail(ctx, from, to, amount, false)
    }

    /// Move `amount` between balances.
    ///
    /// With `is_apply_approve` the owner's approval reservation is not
    /// counted against the usable balance (an approved spender is spending).
    pub fn transfer_detail(
        &self,
        ctx: &BlockContext,
        from: &AccountId,
        to: &AccountId,
        amount: &Coins,
        is_apply_approve: bool,
    ) -> Result<(), AssetError> {
        let mut writes = WriteSet::default();
        self.stage_transfer(ctx, from, to, amount, is_apply_approve, &mut writes)?;
        self.apply(writes);
        Ok(())
    }

    pub(crate) fn stage_transfer(
        &self,
        ctx: &BlockContext,
        from: &AccountId,
        to: &AccountId,
        amount: &Coins,
        is_apply_approve: bool,
        writes: &mut WriteSet,
    ) -> Result<(), AssetError> {
        debug!(module = "asset", %from, %to, %amount, "transfer coins");

        if from.is_empty() {
            return Err(AssetError::FromAccountEmpty);
        }
        if to.is_empty() {
            return Err(AssetError::ToAccountEmpty);
        }
        if amount.is_zero() {
            return Ok(());
        }

        let from_coins = self.get_coins_raw(from)?;
        let from_after = from_coins
            .safe_sub(amount)
            .ok_or_else(|| AssetError::CoinNoEnough(format!("transfer {} from {}", amount, from)))?;

        self.check_usable(from, amount, &from_coins, is_apply_approve)
            .map_err(|e| e.wrap("transfer"))?;

        if from == to {
            return Ok(());
        }

        let to_after = add_coins(&self.get_coins_raw(to)?, amount)?;

        self.accounts
            .ensure_account(ctx, to)
            .map_err(|e| e.wrap(format!("ensure account {}", to)))?;

        writes.put_coins(coin_store_key(to), &to_after)?;
        writes.put_coins(coin_store_key(from), &from_after)?;
        Ok(())
    }

    /// Seed `account` with `coins` at genesis, registering their supply.
    pub fn genesis_coins(
        &self,
        ctx: &BlockContext,
        account: &AccountId,
        coins: &Coins,
    ) -> Result<(), AssetError> {
        let mut writes = WriteSet::default();
        for coin in coins {
            let stat = self.issue_coin_stat(ctx, coin)?;
            writes.put(coin_stat_store_key(&stat.creator, &stat.symbol), &stat)?;
        }

        let balance = add_coins(&self.get_coins_raw(account)?, coins)?;
        writes.put_coins(coin_store_key(account), &balance)?;
        self.apply(writes);

        debug!(module = "asset", %account, %coins, "genesis coins");
        Ok(())
    }

    // =========================================================================
    // Supply bookkeeping
    // =========================================================================

    /// Stat after adding `amount` to supply. Nothing is written.
    pub(crate) fn issue_coin_stat(
        &self,
        ctx: &BlockContext,
        amount: &Coin,
    ) -> Result<CoinStat, AssetError> {
        let mut stat = self.stat_for_denom(&amount.denom)?;

        let new_supply = stat
            .supply
            .amount
            .checked_add(amount.amount)
            .ok_or_else(|| AssetError::Overflow(format!("supply of {}", amount.denom)))?;
        let limit = stat.current_max_supply_limit(ctx.height);

        debug!(
            module = "asset",
            denom = %amount.denom,
            new_supply = %new_supply,
            max_supply = %stat.max_supply.amount,
            limit = %limit,
            "update stat"
        );

        if amount.denom != self.config.native_denom && new_supply > limit {
            return Err(AssetError::IssueGTMaxSupply {
                denom: amount.denom.clone(),
                supply: new_supply,
                limit,
            });
        }

        stat.supply.amount = new_supply;
        Ok(stat)
    }

    /// Stat after removing `amount` from supply. Nothing is written.
    pub(crate) fn burn_coin_stat(&self, amount: &Coin) -> Result<CoinStat, AssetError> {
        let mut stat = self.stat_for_denom(&amount.denom)?;

        stat.supply.amount = stat
            .supply
            .amount
            .checked_sub(amount.amount)
            .ok_or_else(|| AssetError::CoinNoEnough(format!("burn {} exceeds supply", amount)))?;
        Ok(stat)
    }

    fn stat_for_denom(&self, denom: &str) -> Result<CoinStat, AssetError> {
        let (creator, symbol) =
            coin_accounts_from_denom(denom).map_err(|e| e.wrap("issue coin error"))?;

        let stat = self
            .get_stat(&creator, &symbol)?
            .ok_or_else(|| AssetError::CoinNoExit(denom.to_string()))?;

        if stat.creator != creator {
            return Err(AssetError::NoCreator(denom.to_string()));
        }

        let expected = coin_denom(&creator.to_string(), &symbol.to_string());
        validate_denom(&expected).map_err(|_| AssetError::Denom(expected.clone()))?;
        if expected != denom {
            return Err(AssetError::Denom(format!("amount denom {} error", denom)));
        }

        Ok(stat)
    }
}
