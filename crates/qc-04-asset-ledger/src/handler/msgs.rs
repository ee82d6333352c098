//! Asset messages routed to the `asset` handler.

use crate::adapters::codec;
use crate::domain::AssetError;
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Coin, Coins, Name};

/// Router key of the asset module.
pub const ROUTER_KEY: &str = "asset";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetMsg {
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Coins,
    },
    Create {
        creator: Name,
        symbol: Name,
        max_supply: Coin,
        can_issue: bool,
        can_lock: bool,
        can_burn: bool,
        issue_to_height: i64,
        init_supply: Coin,
        desc: Vec<u8>,
    },
    Issue {
        creator: Name,
        symbol: Name,
        amount: Coin,
    },
    Burn {
        id: AccountId,
        amount: Coin,
    },
    Lock {
        id: AccountId,
        amount: Coins,
        unlock_block_height: i64,
    },
    Unlock {
        id: AccountId,
        amount: Coins,
    },
    UnlockFreezed {
        id: AccountId,
        amount: Coins,
    },
    Exercise {
        id: AccountId,
        amount: Coin,
    },
    Approve {
        id: AccountId,
        spender: AccountId,
        amount: Coins,
        is_lock: bool,
    },
    TransferFromApprove {
        owner: AccountId,
        spender: AccountId,
        to: AccountId,
        amount: Coins,
    },
}

impl AssetMsg {
    /// Action name, as carried in the transaction envelope.
    pub fn action(&self) -> &'static str {
        match self {
            AssetMsg::Transfer { .. } => "transfer",
            AssetMsg::Create { .. } => "create@coin",
            AssetMsg::Issue { .. } => "issue",
            AssetMsg::Burn { .. } => "burn",
            AssetMsg::Lock { .. } => "lock@coin",
            AssetMsg::Unlock { .. } => "unlock@coin",
            AssetMsg::UnlockFreezed { .. } => "unlockfreezed",
            AssetMsg::Exercise { .. } => "exercise",
            AssetMsg::Approve { .. } => "approve",
            AssetMsg::TransferFromApprove { .. } => "transfer@app",
        }
    }

    /// Accounts whose authorization the message requires.
    pub fn required_auths(&self) -> Vec<AccountId> {
        match self {
            AssetMsg::Transfer { from, .. } => vec![*from],
            AssetMsg::Create { creator, .. } | AssetMsg::Issue { creator, .. } => {
                vec![AccountId::from(*creator)]
            }
            AssetMsg::Burn { id, .. }
            | AssetMsg::Lock { id, .. }
            | AssetMsg::Unlock { id, .. }
            | AssetMsg::UnlockFreezed { id, .. }
            | AssetMsg::Exercise { id, .. }
            | AssetMsg::Approve { id, .. } => vec![*id],
            AssetMsg::TransferFromApprove { spender, .. } => vec![*spender],
        }
    }

    /// Stateless checks.
    pub fn validate_basic(&self) -> Result<(), AssetError> {
        match self {
            AssetMsg::Transfer { amount, .. } => amount.validate().map_err(AssetError::from),
            AssetMsg::Create {
                creator,
                symbol,
                max_supply,
                init_supply,
                ..
            } => {
                if creator.is_empty() {
                    return Err(AssetError::FromAccountEmpty);
                }
                if symbol.is_empty() {
                    return Err(AssetError::SymbolError("empty symbol".to_string()));
                }
                if max_supply.is_zero() {
                    return Err(AssetError::CoinNoZero);
                }
                max_supply.validate()?;
                init_supply.validate()?;
                Ok(())
            }
            AssetMsg::Issue { amount, .. }
            | AssetMsg::Burn { amount, .. }
            | AssetMsg::Exercise { amount, .. } => non_zero_coin(amount),
            AssetMsg::Lock { amount, .. }
            | AssetMsg::Unlock { amount, .. }
            | AssetMsg::UnlockFreezed { amount, .. }
            | AssetMsg::TransferFromApprove { amount, .. } => non_zero_coins(amount),
            AssetMsg::Approve { id, spender, amount, .. } => {
                if id.is_empty() {
                    return Err(AssetError::FromAccountEmpty);
                }
                if spender.is_empty() {
                    return Err(AssetError::ToAccountEmpty);
                }
                amount.validate().map_err(AssetError::from)
            }
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, AssetError> {
        codec::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, AssetError> {
        codec::decode(bytes)
    }
}

fn non_zero_coin(coin: &Coin) -> Result<(), AssetError> {
    if coin.is_zero() {
        return Err(AssetError::CoinNoZero);
    }
    coin.validate().map_err(AssetError::from)
}

fn non_zero_coins(coins: &Coins) -> Result<(), AssetError> {
    if coins.is_zero() {
        return Err(AssetError::CoinNoZero);
    }
    coins.validate().map_err(AssetError::from)
}
