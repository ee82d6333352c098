//! Lock schedules and the usable-balance rule.

use super::{add_coins, AssetKeeper, WriteSet};
use crate::domain::{
    coin_locked_stat_store_key, coin_locked_store_key, AccountLockedCoins, AssetError,
    LockedCoins, FOREVER_UNLOCK_HEIGHT,
};
use crate::ports::{AccountEnsurer, KvStore};
use shared_types::{AccountId, BlockContext, Coins};
use tracing::debug;

impl<S: KvStore, A: AccountEnsurer> AssetKeeper<S, A> {
    /// Lock `coins` of `account` until `unlock_block_height`.
    ///
    /// Heights `<= 0` lock forever; all forever locks of an account share
    /// one bucket.
    pub fn lock_coins(
        &self,
        ctx: &BlockContext,
        account: &AccountId,
        unlock_block_height: i64,
        coins: &Coins,
    ) -> Result<(), AssetError> {
        if coins.is_zero() {
            return Ok(());
        }

        let current = self.get_coins_raw(account)?;
        let locked = self.get_locked_sum(account)?;
        let locked_all = add_coins(&locked, coins)?;

        if !current.is_all_gte(&locked_all) {
            return Err(AssetError::LockCoinsNoEnough(format!(
                "balance {} < locked {}",
                current, locked_all
            )));
        }

        if unlock_block_height > 0 && unlock_block_height <= ctx.height {
            return Err(AssetError::LockUnlockBlockHeightErr {
                unlock_height: unlock_block_height,
                current: ctx.height,
            });
        }

        let unlock_block_height = if unlock_block_height <= 0 {
            FOREVER_UNLOCK_HEIGHT
        } else {
            unlock_block_height
        };

        let mut stat = self.get_locked_stat(account)?;
        let forever_bucket = if unlock_block_height == FOREVER_UNLOCK_HEIGHT {
            stat.lockeds.iter_mut().find(|l| l.is_forever())
        } else {
            None
        };

        match forever_bucket {
            Some(bucket) => bucket.coins = add_coins(&bucket.coins, coins)?,
            None => stat.lockeds.push(LockedCoins {
                coins: coins.clone(),
                unlock_block_height,
            }),
        }

        let mut writes = WriteSet::default();
        self.stage_locked(account, &stat, &locked_all, &mut writes)?;
        self.apply(writes);

        debug!(module = "asset", %account, %coins, unlock_block_height, "lock coins");
        Ok(())
    }

    /// Release every matured finite bucket. `coins` must equal their sum exactly.
    pub fn unlock_coins(
        &self,
        ctx: &BlockContext,
        account: &AccountId,
        coins: &Coins,
    ) -> Result<(), AssetError> {
        let locked = self.get_locked_sum(account)?;
        let stat = self.get_locked_stat(account)?;

        let mut matured = Coins::empty();
        let mut kept = Vec::with_capacity(stat.lockeds.len());
        for bucket in stat.lockeds {
            if bucket.is_matured(ctx.height) {
                matured = add_coins(&matured, &bucket.coins)?;
            } else {
                kept.push(bucket);
            }
        }

        if !matured.is_equal(coins) {
            return Err(AssetError::UnLockCoins(format!("unlock should be {}", matured)));
        }

        let remaining = locked.safe_sub(&matured).ok_or_else(|| {
            AssetError::UnLockCoins(format!("unlock sum {} >= locked {}", matured, locked))
        })?;

        let new_stat = AccountLockedCoins {
            id: *account,
            lockeds: kept,
        };

        let mut writes = WriteSet::default();
        self.stage_locked(account, &new_stat, &remaining, &mut writes)?;
        self.apply(writes);

        debug!(module = "asset", %account, %coins, height = ctx.height, "unlock coins");
        Ok(())
    }

    /// Release part of the forever bucket.
    pub fn unlock_freezed_coins(
        &self,
        _ctx: &BlockContext,
        account: &AccountId,
        coins: &Coins,
    ) -> Result<(), AssetError> {
        let locked = self.get_locked_sum(account)?;
        let mut stat = self.get_locked_stat(account)?;

        let idx = stat
            .lockeds
            .iter()
            .position(|l| l.is_forever())
            .ok_or_else(|| AssetError::UnLockCoins("no found locked freezed coins".to_string()))?;

        let bucket_after = stat.lockeds[idx].coins.safe_sub(coins).ok_or_else(|| {
            AssetError::UnLockCoins(format!(
                "unlock {} > freezed {}",
                coins, stat.lockeds[idx].coins
            ))
        })?;

        let remaining = locked.safe_sub(coins).ok_or_else(|| {
            AssetError::UnLockCoins(format!("unlock {} > locked {}", coins, locked))
        })?;

        if bucket_after.is_zero() {
            stat.lockeds.remove(idx);
        } else {
            stat.lockeds[idx].coins = bucket_after;
        }

        let mut writes = WriteSet::default();
        self.stage_locked(account, &stat, &remaining, &mut writes)?;
        self.apply(writes);

        debug!(module = "asset", %account, %coins, "unlock freezed coins");
        Ok(())
    }

    /// Locked sum and buckets of `account`.
    pub fn get_lock_coins(
        &self,
        account: &AccountId,
    ) -> Result<(Coins, Vec<LockedCoins>), AssetError> {
        let stat = self.get_locked_stat(account)?;
        let all = self.get_locked_sum(account)?;
        Ok((all, stat.lockeds))
    }

    /// Whether `account` may spend `coins` now (approvals count as reserved).
    pub fn check_is_can_use_coins(
        &self,
        account: &AccountId,
        coins: &Coins,
    ) -> Result<(), AssetError> {
        let current = self.get_coins_raw(account)?;
        self.check_usable(account, coins, &current, false)
    }

    /// `current >= locked + approve_sum(unless applying approve) + coins`.
    pub(crate) fn check_usable(
        &self,
        account: &AccountId,
        coins: &Coins,
        current: &Coins,
        is_apply_approve: bool,
    ) -> Result<(), AssetError> {
        let mut reserved = self.get_locked_sum(account)?;

        if !is_apply_approve {
            let approve_sum = self.get_approve_sum_raw(account)?;
            reserved = add_coins(&reserved, &approve_sum)?;
        }

        let needed = add_coins(&reserved, coins)?;
        if current.is_all_gte(&needed) {
            Ok(())
        } else {
            Err(AssetError::CoinsLocked(format!(
                "{} needs {} usable, has {}",
                account, needed, current
            )))
        }
    }

    fn stage_locked(
        &self,
        account: &AccountId,
        stat: &AccountLockedCoins,
        sum: &Coins,
        writes: &mut WriteSet,
    ) -> Result<(), AssetError> {
        if stat.lockeds.is_empty() {
            writes.delete(coin_locked_stat_store_key(account));
        } else {
            writes.put(coin_locked_stat_store_key(account), stat)?;
        }
        writes.put_coins(coin_locked_store_key(account), sum)
    }
}
