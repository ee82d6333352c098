//! Spender allowances.
//!
//! `approvesum(owner)` always equals the sum of every `approve(owner, *)`
//! entry. Approved coins stay in the owner's balance but are reserved: the
//! owner's own spends must leave them untouched.

use super::{add_coins, AssetKeeper, WriteSet};
use crate::domain::{approve_store_key, approve_sum_store_key, ApproveData, AssetError};
use crate::ports::{AccountEnsurer, KvStore};
use shared_types::{AccountId, BlockContext, Coins};
use tracing::debug;

impl<S: KvStore, A: AccountEnsurer> AssetKeeper<S, A> {
    /// Set the allowance of `spender` over `owner`'s coins. A zero amount
    /// removes it.
    pub fn approve(
        &self,
        _ctx: &BlockContext,
        owner: &AccountId,
        spender: &AccountId,
        amount: &Coins,
        is_lock: bool,
    ) -> Result<(), AssetError> {
        if owner.is_empty() {
            return Err(AssetError::FromAccountEmpty);
        }
        if spender.is_empty() {
            return Err(AssetError::ToAccountEmpty);
        }

        let old = self.get_approve(owner, spender)?.unwrap_or_default();
        let sum = self.get_approve_sum_raw(owner)?;
        let sum = sum
            .safe_sub(&old.amount)
            .ok_or_else(|| AssetError::CoinNoEnough(format!("approve sum {} < {}", sum, old.amount)))?;
        let sum = add_coins(&sum, amount)?;

        let mut writes = WriteSet::default();
        self.stage_approve(
            owner,
            spender,
            &ApproveData {
                amount: amount.clone(),
                is_lock,
            },
            &mut writes,
        )?;
        writes.put_coins(approve_sum_store_key(owner), &sum)?;
        self.apply(writes);

        debug!(module = "asset", %owner, %spender, %amount, is_lock, "approve coins");
        Ok(())
    }

    /// `spender` moves `amount` of `owner`'s coins to `to`, consuming the
    /// allowance. Sending back to `owner` moves nothing and keeps the
    /// allowance.
    pub fn transfer_from_approve(
        &self,
        ctx: &BlockContext,
        owner: &AccountId,
        spender: &AccountId,
        to: &AccountId,
        amount: &Coins,
    ) -> Result<(), AssetError> {
        let approval = self.get_approve(owner, spender)?.ok_or_else(|| {
            AssetError::CoinNoEnough(format!("{} has no allowance from {}", spender, owner))
        })?;

        let remaining = approval.amount.safe_sub(amount).ok_or_else(|| {
            AssetError::CoinNoEnough(format!("allowance {} < {}", approval.amount, amount))
        })?;

        let sum = self.get_approve_sum_raw(owner)?;
        let sum_after = sum
            .safe_sub(amount)
            .ok_or_else(|| AssetError::CoinNoEnough(format!("approve sum {} < {}", sum, amount)))?;

        let mut writes = WriteSet::default();
        self.stage_transfer(ctx, owner, to, amount, true, &mut writes)
            .map_err(|e| e.wrap("transfer from approve"))?;
        if to == owner {
            debug!(module = "asset", %owner, %spender, %amount, "transfer from approve to owner");
            return Ok(());
        }
        self.stage_approve(
            owner,
            spender,
            &ApproveData {
                amount: remaining,
                is_lock: approval.is_lock,
            },
            &mut writes,
        )?;
        writes.put_coins(approve_sum_store_key(owner), &sum_after)?;
        self.apply(writes);

        debug!(module = "asset", %owner, %spender, %to, %amount, "transfer from approve");
        Ok(())
    }

    pub fn get_approve_coins(
        &self,
        owner: &AccountId,
        spender: &AccountId,
    ) -> Result<Option<ApproveData>, AssetError> {
        self.get_approve(owner, spender)
    }

    /// Total of all allowances granted by `owner`.
    pub fn get_approve_sum(&self, owner: &AccountId) -> Result<Coins, AssetError> {
        self.get_approve_sum_raw(owner)
    }

    fn stage_approve(
        &self,
        owner: &AccountId,
        spender: &AccountId,
        data: &ApproveData,
        writes: &mut WriteSet,
    ) -> Result<(), AssetError> {
        let key = approve_store_key(owner, spender);
        if data.amount.is_zero() {
            writes.delete(key);
            Ok(())
        } else {
            writes.put(key, data)
        }
    }
}
