//! # Domain Entities for the Asset Ledger
//!
//! Per-denom supply policy ([`CoinStat`]), coin descriptions, lock
//! schedules and allowances.
//!
//! ## Type Decisions
//!
//! - Amounts are `u128` (via [`Coin`]). Intermediate vesting arithmetic is
//!   done in `U256` so `(max - init) * elapsed` never overflows.
//! - Heights are `i64`; an unlock height `<= 0` means "locked forever".

use crate::domain::errors::AssetError;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use shared_types::{coin_denom, split_denom, AccountId, Coin, Coins, Name};

/// Unlock height stored for every forever-lock bucket.
pub const FOREVER_UNLOCK_HEIGHT: i64 = -1;

// =============================================================================
// CLUSTER A: Coin supply policy
// =============================================================================

/// Optional issuance policy chosen at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinOptions {
    pub can_issue: bool,
    pub can_lock: bool,
    pub can_burn: bool,
    /// 0 = the whole max supply is issuable immediately.
    pub issue_to_height: i64,
    /// Supply available at creation when vesting by block.
    pub init_supply: Coin,
}

impl CoinOptions {
    /// Fully permissive options with no vesting schedule.
    pub fn unrestricted(denom: &str) -> Self {
        Self {
            can_issue: true,
            can_lock: true,
            can_burn: true,
            issue_to_height: 0,
            init_supply: Coin::new(denom, 0),
        }
    }
}

/// Supply state of one coin type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinStat {
    pub symbol: Name,
    pub creator: Name,
    pub create_height: i64,
    pub supply: Coin,
    pub max_supply: Coin,
    pub can_issue: bool,
    pub can_lock: bool,
    pub can_burn: bool,
    pub issue_to_height: i64,
    pub init_supply: Coin,
}

impl CoinStat {
    pub fn new(creator: Name, symbol: Name, create_height: i64, max_supply: Coin) -> Self {
        let denom = max_supply.denom.clone();
        Self {
            symbol,
            creator,
            create_height,
            supply: Coin::new(denom.clone(), 0),
            max_supply,
            can_issue: false,
            can_lock: false,
            can_burn: false,
            issue_to_height: 0,
            init_supply: Coin::new(denom, 0),
        }
    }

    pub fn denom(&self) -> String {
        coin_denom(&self.creator.to_string(), &self.symbol.to_string())
    }

    /// Validate and apply creation options.
    pub fn set_opts(&mut self, opts: &CoinOptions) -> Result<(), AssetError> {
        check_coin_stat_opts(
            self.create_height,
            opts.can_issue,
            opts.issue_to_height,
            &opts.init_supply,
            &self.max_supply,
        )?;

        self.can_issue = opts.can_issue;
        self.can_lock = opts.can_lock;
        self.can_burn = opts.can_burn;
        self.issue_to_height = opts.issue_to_height;
        self.init_supply = opts.init_supply.clone();
        Ok(())
    }

    /// Maximum supply allowed at `height` under the linear vesting schedule.
    ///
    /// ```text
    /// limit = init + (max - init) * (h - create) / (issue_to - create)
    /// ```
    pub fn current_max_supply_limit(&self, height: i64) -> u128 {
        if self.issue_to_height == 0 {
            return self.max_supply.amount;
        }
        if height <= self.create_height || self.issue_to_height <= self.create_height {
            return 0;
        }
        if height >= self.issue_to_height {
            return self.max_supply.amount;
        }
        if self.max_supply.amount < self.init_supply.amount {
            return self.max_supply.amount;
        }

        let issued = (height - self.create_height) as u128;
        let all = (self.issue_to_height - self.create_height) as u128;
        let need = self.max_supply.amount - self.init_supply.amount;

        let added = U256::from(need) * U256::from(issued) / U256::from(all);
        // added <= need, so it fits
        self.init_supply.amount + added.low_u128()
    }
}

/// Consistency rules between issuance options and supply bounds.
pub fn check_coin_stat_opts(
    create_height: i64,
    can_issue: bool,
    issue_to_height: i64,
    init: &Coin,
    max: &Coin,
) -> Result<(), AssetError> {
    if !can_issue && (issue_to_height != 0 || !init.is_zero()) {
        return Err(AssetError::MustCanIssueWhenIssueByBlock);
    }

    if issue_to_height != 0 {
        if max.amount < init.amount {
            return Err(AssetError::MaxSupplyNeedGTInitSupply);
        }
        if issue_to_height <= create_height {
            return Err(AssetError::IssueToHeightMustGTCurrentHeight);
        }
    }

    if !(init.is_zero() || max.amount >= init.amount) {
        return Err(AssetError::MaxSupplyShouldGTEInitSupply);
    }

    Ok(())
}

/// Parse a denom into its `(creator, symbol)` names.
pub fn coin_accounts_from_denom(denom: &str) -> Result<(Name, Name), AssetError> {
    let (creator, symbol) = split_denom(denom);
    let creator = Name::new(creator).map_err(|_| AssetError::Denom(denom.to_string()))?;
    let symbol = Name::new(symbol).map_err(|_| AssetError::Denom(denom.to_string()))?;
    if symbol.is_empty() {
        return Err(AssetError::Denom(denom.to_string()));
    }
    Ok((creator, symbol))
}

/// Free-form description attached to a coin at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinDescription {
    pub symbol: Name,
    pub creator: Name,
    pub description: Vec<u8>,
}

// =============================================================================
// CLUSTER B: Locks and allowances
// =============================================================================

/// One lock bucket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedCoins {
    pub coins: Coins,
    pub unlock_block_height: i64,
}

impl LockedCoins {
    pub fn is_forever(&self) -> bool {
        self.unlock_block_height <= 0
    }

    /// Matured at `height` (forever buckets never mature).
    pub fn is_matured(&self, height: i64) -> bool {
        !self.is_forever() && self.unlock_block_height <= height
    }
}

/// The full lock schedule of one account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLockedCoins {
    pub id: AccountId,
    pub lockeds: Vec<LockedCoins>,
}

/// An allowance from an owner to a spender.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveData {
    pub amount: Coins,
    pub is_lock: bool,
}
