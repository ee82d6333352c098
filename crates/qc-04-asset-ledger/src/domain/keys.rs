//! Store key layout.
//!
//! ```text
//! [0x02] ++ packed(sub-prefix name) ++ account store key | creator ++ symbol
//! ```
//!
//! Sub-prefix names are full 17-byte packed names, so `coin` never prefixes
//! `coin.power`.

use crate::domain::errors::AssetError;
use shared_types::{AccountId, Name, ACCOUNT_ID_STORE_KEY_LEN};

/// Leading byte of every asset key.
pub const ASSET_MODULE_KEY_PREFIX: u8 = 0x02;

/// Sub-prefix namespaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySpace {
    Coin,
    CoinPower,
    CoinLocked,
    CoinLockedStat,
    CoinStat,
    CoinDesc,
    Approve,
    ApproveSum,
}

impl KeySpace {
    pub fn name(self) -> &'static str {
        match self {
            KeySpace::Coin => "coin",
            KeySpace::CoinPower => "coin.power",
            KeySpace::CoinLocked => "coin.lock",
            KeySpace::CoinLockedStat => "coin.locks",
            KeySpace::CoinStat => "coin.stat",
            KeySpace::CoinDesc => "coin.desc",
            KeySpace::Approve => "coin.approve",
            KeySpace::ApproveSum => "coin.approvesum",
        }
    }

    /// `0x02 ++ packed(name)`.
    pub fn prefix(self) -> Vec<u8> {
        // all sub-prefix names are valid literals
        let packed = Name::new(self.name()).unwrap_or_default();
        let mut out = Vec::with_capacity(1 + packed.as_bytes().len());
        out.push(ASSET_MODULE_KEY_PREFIX);
        out.extend_from_slice(packed.as_bytes());
        out
    }

    fn key(self, parts: &[&[u8]]) -> Vec<u8> {
        let mut out = self.prefix();
        for part in parts {
            out.extend_from_slice(part);
        }
        out
    }
}

pub fn coin_store_key(account: &AccountId) -> Vec<u8> {
    KeySpace::Coin.key(&[&account.store_key()])
}

pub fn coin_power_store_key(account: &AccountId) -> Vec<u8> {
    KeySpace::CoinPower.key(&[&account.store_key()])
}

pub fn coin_locked_store_key(account: &AccountId) -> Vec<u8> {
    KeySpace::CoinLocked.key(&[&account.store_key()])
}

pub fn coin_locked_stat_store_key(account: &AccountId) -> Vec<u8> {
    KeySpace::CoinLockedStat.key(&[&account.store_key()])
}

pub fn coin_stat_store_key(creator: &Name, symbol: &Name) -> Vec<u8> {
    if creator.is_empty() {
        KeySpace::CoinStat.key(&[symbol.as_bytes()])
    } else {
        KeySpace::CoinStat.key(&[creator.as_bytes(), symbol.as_bytes()])
    }
}

pub fn coin_desc_store_key(creator: &Name, symbol: &Name) -> Vec<u8> {
    if creator.is_empty() {
        KeySpace::CoinDesc.key(&[symbol.as_bytes()])
    } else {
        KeySpace::CoinDesc.key(&[creator.as_bytes(), symbol.as_bytes()])
    }
}

pub fn approve_store_key(owner: &AccountId, spender: &AccountId) -> Vec<u8> {
    KeySpace::Approve.key(&[&owner.store_key(), &spender.store_key()])
}

pub fn approve_sum_store_key(owner: &AccountId) -> Vec<u8> {
    KeySpace::ApproveSum.key(&[&owner.store_key()])
}

/// Recover the account id from a per-account key in `space`.
pub fn account_id_from_key(space: KeySpace, key: &[u8]) -> Result<AccountId, AssetError> {
    let prefix = space.prefix();
    let rest = key
        .strip_prefix(prefix.as_slice())
        .ok_or_else(|| AssetError::Codec(format!("key not in {} space", space.name())))?;
    if rest.len() > ACCOUNT_ID_STORE_KEY_LEN {
        return Err(AssetError::Codec(format!("account key too long: {}", rest.len())));
    }
    AccountId::from_store_key(rest).map_err(|e| AssetError::Codec(e.to_string()))
}
