//! # Account Identifiers
//!
//! An account is addressed either by a packed [`Name`] or by a raw
//! 20-byte [`Address`]. Both forms map to a fixed 21-byte store key.
//!
//! | Variant | String form          | Store key                        |
//! |---------|----------------------|----------------------------------|
//! | Empty   | `""`                 | empty                            |
//! | Name    | `"alice"` (≤17 chars) | 17 packed bytes + 4 zero bytes  |
//! | Address | 40 hex chars         | `0x02` ++ 20 address bytes       |

use crate::errors::IdentifierError;
use crate::name::{Name, NAME_BYTES_LEN, NAME_STR_LEN_MAX};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of a raw address.
pub const ADDRESS_LEN: usize = 20;

/// Length of an account store key.
pub const ACCOUNT_ID_STORE_KEY_LEN: usize = 21;

const TAG_NAME: u8 = 1;
const TAG_ADDRESS: u8 = 2;

// =============================================================================
// ADDRESS
// =============================================================================

/// A 20-byte account address, rendered as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    pub fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Build from a slice; the slice must be exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdentifierError> {
        let arr: [u8; ADDRESS_LEN] = bytes
            .try_into()
            .map_err(|_| IdentifierError::InvalidAddress(hex::encode(bytes)))?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|_| IdentifierError::InvalidAddress(s.to_string()))?;
        Address::from_slice(&bytes).map_err(|_| IdentifierError::InvalidAddress(s.to_string()))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// ACCOUNT ID
// =============================================================================

/// Identifies an account by name or by address.
///
/// `Name` holding the empty name is the same account as `Empty`: equality,
/// ordering, hashing and store keys all see one empty id.
#[derive(Clone, Copy, Default)]
pub enum AccountId {
    #[default]
    Empty,
    Name(Name),
    Address(Address),
}

impl AccountId {
    pub fn from_name(name: Name) -> Self {
        if name.is_empty() {
            AccountId::Empty
        } else {
            AccountId::Name(name)
        }
    }

    pub fn from_address(address: Address) -> Self {
        AccountId::Address(address)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AccountId::Empty => true,
            AccountId::Name(n) => n.is_empty(),
            AccountId::Address(_) => false,
        }
    }

    /// Rank and bytes compared by `Eq`, `Ord` and `Hash`.
    fn identity(&self) -> (u8, &[u8]) {
        match self {
            AccountId::Name(n) if !n.is_empty() => (TAG_NAME, &n.as_bytes()[..]),
            AccountId::Address(a) => (TAG_ADDRESS, &a.as_bytes()[..]),
            _ => (0, &[]),
        }
    }

    pub fn name(&self) -> Option<Name> {
        match self {
            AccountId::Name(n) => Some(*n),
            _ => None,
        }
    }

    pub fn address(&self) -> Option<Address> {
        match self {
            AccountId::Address(a) => Some(*a),
            _ => None,
        }
    }

    /// Fixed-width key used to index per-account records.
    pub fn store_key(&self) -> Vec<u8> {
        match self {
            AccountId::Name(n) if !n.is_empty() => {
                let mut key = vec![0u8; ACCOUNT_ID_STORE_KEY_LEN];
                key[..NAME_BYTES_LEN].copy_from_slice(n.as_bytes());
                key
            }
            AccountId::Address(a) => {
                let mut key = Vec::with_capacity(ACCOUNT_ID_STORE_KEY_LEN);
                key.push(TAG_ADDRESS);
                key.extend_from_slice(a.as_bytes());
                key
            }
            _ => Vec::new(),
        }
    }

    /// Inverse of [`AccountId::store_key`].
    pub fn from_store_key(key: &[u8]) -> Result<Self, IdentifierError> {
        if key.is_empty() {
            return Ok(AccountId::Empty);
        }
        if key.len() != ACCOUNT_ID_STORE_KEY_LEN {
            return Err(IdentifierError::InvalidStoreKey(key.len()));
        }
        match key[0] {
            TAG_NAME => Ok(AccountId::from_name(Name::from_bytes(&key[..NAME_BYTES_LEN]))),
            TAG_ADDRESS => Ok(AccountId::Address(Address::from_slice(&key[1..])?)),
            tag => Err(IdentifierError::UnknownAccountTag(tag)),
        }
    }
}

impl PartialEq for AccountId {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for AccountId {}

impl PartialOrd for AccountId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AccountId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.identity().cmp(&other.identity())
    }
}

impl std::hash::Hash for AccountId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl From<Name> for AccountId {
    fn from(name: Name) -> Self {
        AccountId::from_name(name)
    }
}

impl From<Address> for AccountId {
    fn from(address: Address) -> Self {
        AccountId::Address(address)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountId::Empty => Ok(()),
            AccountId::Name(n) => fmt::Display::fmt(n, f),
            AccountId::Address(a) => fmt::Display::fmt(a, f),
        }
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountId::Empty => f.write_str("AccountId(<empty>)"),
            _ => write!(f, "AccountId({})", self),
        }
    }
}

impl FromStr for AccountId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(AccountId::Empty);
        }
        if s.len() <= NAME_STR_LEN_MAX {
            return Ok(AccountId::from_name(Name::new(s)?));
        }
        Ok(AccountId::Address(s.parse()?))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
