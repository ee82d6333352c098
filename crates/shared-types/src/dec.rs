//! # Decimal Coins
//!
//! 18-digit fixed-point decimals, used for gas prices. Only the
//! operations the fee path needs are provided: parse, compare, and
//! `price * gas` rounded up to a whole coin amount.

use crate::coins::{validate_denom, Coin, Coins};
use crate::errors::IdentifierError;
use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits.
pub const DEC_PRECISION: u32 = 18;

const DEC_ONE: u128 = 1_000_000_000_000_000_000;

/// Non-negative fixed-point decimal with 18 fractional digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dec(u128);

impl Dec {
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Whole-number decimal; `None` if it does not fit.
    pub fn from_int(v: u128) -> Option<Self> {
        v.checked_mul(DEC_ONE).map(Self)
    }

    /// `num / den` truncated to 18 digits.
    pub fn from_ratio(num: u128, den: u128) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let v = U256::from(num) * U256::from(DEC_ONE) / U256::from(den);
        u256_to_u128(v).map(Self)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// `self * gas`, rounded up to an integer; `None` on overflow.
    pub fn mul_ceil_u64(&self, gas: u64) -> Option<u128> {
        let product = U256::from(self.0) * U256::from(gas);
        let one = U256::from(DEC_ONE);
        let ceil = (product + one - U256::one()) / one;
        u256_to_u128(ceil)
    }
}

fn u256_to_u128(v: U256) -> Option<u128> {
    if v > U256::from(u128::MAX) {
        None
    } else {
        Some(v.as_u128())
    }
}

impl FromStr for Dec {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || IdentifierError::InvalidDec(s.to_string());

        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() || frac_part.len() > DEC_PRECISION as usize {
            return Err(bad());
        }
        if !int_part.bytes().all(|c| c.is_ascii_digit()) || !frac_part.bytes().all(|c| c.is_ascii_digit()) {
            return Err(bad());
        }

        let int: u128 = int_part.parse().map_err(|_| bad())?;
        let mut frac: u128 = 0;
        if !frac_part.is_empty() {
            frac = frac_part.parse().map_err(|_| bad())?;
            frac *= 10u128.pow(DEC_PRECISION - frac_part.len() as u32);
        }

        int.checked_mul(DEC_ONE)
            .and_then(|v| v.checked_add(frac))
            .map(Dec)
            .ok_or_else(bad)
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:018}", self.0 / DEC_ONE, self.0 % DEC_ONE)
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// DEC COINS
// =============================================================================

/// A denom with a decimal amount.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecCoin {
    pub denom: String,
    pub amount: Dec,
}

impl DecCoin {
    pub fn new(denom: impl Into<String>, amount: Dec) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

/// A list of decimal coins, sorted by denom.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecCoins(Vec<DecCoin>);

impl DecCoins {
    pub fn new(coins: impl IntoIterator<Item = DecCoin>) -> Self {
        let mut v: Vec<DecCoin> = coins.into_iter().collect();
        v.sort_by(|a, b| a.denom.cmp(&b.denom));
        v.dedup_by(|a, b| a.denom == b.denom);
        Self(v)
    }

    pub fn validate(&self) -> Result<(), IdentifierError> {
        self.0.iter().try_for_each(|c| validate_denom(&c.denom))
    }

    /// True when every amount is zero (or the list is empty).
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|c| c.amount.is_zero())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DecCoin> {
        self.0.iter()
    }

    /// `ceil(price * gas)` per denom; `None` on overflow.
    pub fn required_fees(&self, gas: u64) -> Option<Coins> {
        let mut out = Vec::with_capacity(self.0.len());
        for price in &self.0 {
            out.push(Coin::new(price.denom.clone(), price.amount.mul_ceil_u64(gas)?));
        }
        Some(Coins::new(out))
    }
}
