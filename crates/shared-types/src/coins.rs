//! # Coins
//!
//! Multi-denomination amounts. A [`Coins`] value is always canonical:
//! sorted by denom, no duplicates, no zero amounts. Arithmetic that could
//! leave that form (overflow, negative result) returns `None` instead.

use crate::errors::IdentifierError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Maximum length of a denom string.
pub const DENOM_MAX_LEN: usize = 128;

/// Minimum length of a denom string.
pub const DENOM_MIN_LEN: usize = 2;

/// Separator between creator and symbol in a denom.
pub const DENOM_SEPARATOR: char = '/';

/// Build the denom of a coin from its creator and symbol.
///
/// An empty creator yields the bare symbol.
pub fn coin_denom(creator: &str, symbol: &str) -> String {
    if creator.is_empty() {
        symbol.to_string()
    } else {
        format!("{}{}{}", creator, DENOM_SEPARATOR, symbol)
    }
}

/// Split a denom into `(creator, symbol)`.
///
/// A denom without a separator has an empty creator.
pub fn split_denom(denom: &str) -> (&str, &str) {
    match denom.split_once(DENOM_SEPARATOR) {
        Some((creator, symbol)) => (creator, symbol),
        None => ("", denom),
    }
}

/// Validate a denom: 2..=128 chars, lowercase letter first,
/// then `[a-z0-9._@/]`.
pub fn validate_denom(denom: &str) -> Result<(), IdentifierError> {
    let bad = || IdentifierError::InvalidDenom(denom.to_string());

    if denom.len() < DENOM_MIN_LEN || denom.len() > DENOM_MAX_LEN {
        return Err(bad());
    }
    let mut bytes = denom.bytes();
    match bytes.next() {
        Some(b'a'..=b'z') => {}
        _ => return Err(bad()),
    }
    let valid_tail =
        |c: u8| matches!(c, b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'@' | b'/');
    if !bytes.all(valid_tail) {
        return Err(bad());
    }
    Ok(())
}

// Amounts travel as decimal strings so JSON sign bytes stay exact.
mod amount_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &u128, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&v.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// COIN
// =============================================================================

/// A single-denomination amount.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "amount_string")]
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn validate(&self) -> Result<(), IdentifierError> {
        validate_denom(&self.denom)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

// =============================================================================
// COINS
// =============================================================================

/// A canonical set of coins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins(Vec<Coin>);

impl Coins {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Normalize arbitrary coins: sort, merge duplicates, drop zeros.
    ///
    /// Duplicate amounts saturate; use [`Coins::try_from`] for untrusted input.
    pub fn new(coins: impl IntoIterator<Item = Coin>) -> Self {
        let mut items: Vec<Coin> = coins.into_iter().filter(|c| !c.is_zero()).collect();
        items.sort_by(|a, b| a.denom.cmp(&b.denom));

        let mut out: Vec<Coin> = Vec::with_capacity(items.len());
        for coin in items {
            match out.last_mut() {
                Some(last) if last.denom == coin.denom => {
                    last.amount = last.amount.saturating_add(coin.amount);
                }
                _ => out.push(coin),
            }
        }
        Self(out)
    }

    pub fn from_coin(coin: Coin) -> Self {
        Self::new(std::iter::once(coin))
    }

    /// Validate canonical form and denoms.
    pub fn validate(&self) -> Result<(), IdentifierError> {
        for coin in &self.0 {
            coin.validate()?;
            if coin.is_zero() {
                return Err(IdentifierError::InvalidCoins(format!("zero amount {}", coin.denom)));
            }
        }
        for pair in self.0.windows(2) {
            if pair[0].denom >= pair[1].denom {
                return Err(IdentifierError::InvalidCoins(format!(
                    "unsorted or duplicate denom {}",
                    pair[1].denom
                )));
            }
        }
        Ok(())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    pub fn denoms(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|c| c.denom.as_str())
    }

    pub fn amount_of(&self, denom: &str) -> u128 {
        self.0
            .binary_search_by(|c| c.denom.as_str().cmp(denom))
            .map(|i| self.0[i].amount)
            .unwrap_or(0)
    }

    /// Sum of two coin sets; `None` on overflow.
    pub fn checked_add(&self, other: &Coins) -> Option<Coins> {
        let (a, b) = (&self.0, &other.0);
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);

        while i < a.len() && j < b.len() {
            match a[i].denom.cmp(&b[j].denom) {
                Ordering::Less => {
                    out.push(a[i].clone());
                    i += 1;
                }
                Ordering::Greater => {
                    out.push(b[j].clone());
                    j += 1;
                }
                Ordering::Equal => {
                    out.push(Coin::new(a[i].denom.clone(), a[i].amount.checked_add(b[j].amount)?));
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&a[i..]);
        out.extend_from_slice(&b[j..]);

        Some(Coins(out))
    }

    /// Difference of two coin sets; `None` if any denom would go negative.
    pub fn safe_sub(&self, other: &Coins) -> Option<Coins> {
        let mut out = self.0.clone();
        for coin in &other.0 {
            match out.binary_search_by(|c| c.denom.cmp(&coin.denom)) {
                Ok(i) => {
                    out[i].amount = out[i].amount.checked_sub(coin.amount)?;
                }
                Err(_) if coin.is_zero() => {}
                Err(_) => return None,
            }
        }
        out.retain(|c| !c.is_zero());
        Some(Coins(out))
    }

    /// Every denom of `other` is covered by `self`.
    pub fn is_all_gte(&self, other: &Coins) -> bool {
        other.0.iter().all(|c| self.amount_of(&c.denom) >= c.amount)
    }

    /// Some non-zero denom of `other` is covered by `self`.
    pub fn is_any_gte(&self, other: &Coins) -> bool {
        other
            .0
            .iter()
            .any(|c| !c.is_zero() && self.amount_of(&c.denom) >= c.amount)
    }

    /// Some denom of `self` strictly exceeds the same denom of `other`.
    pub fn is_any_gt(&self, other: &Coins) -> bool {
        self.0.iter().any(|c| c.amount > other.amount_of(&c.denom))
    }

    pub fn is_equal(&self, other: &Coins) -> bool {
        self == other
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = IdentifierError;

    fn try_from(coins: Vec<Coin>) -> Result<Self, Self::Error> {
        let c = Coins(coins);
        c.validate()?;
        Ok(c)
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(coins: Coins) -> Self {
        coins.0
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", coin)?;
        }
        Ok(())
    }
}
