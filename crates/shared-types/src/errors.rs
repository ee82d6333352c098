//! Shared error types and the registered-error code contract.

use thiserror::Error;

/// A registered error: every consensus-visible error carries a codespace
/// and a numeric code, and clients match on the pair.
pub trait ErrorCode {
    /// Module namespace of the error (e.g. `"asset"`, `"sdk"`).
    fn codespace(&self) -> &'static str;

    /// Numeric code, unique within the codespace.
    fn code(&self) -> u32;

    /// True when `other` names the same registered error.
    fn is(&self, other: &dyn ErrorCode) -> bool {
        self.codespace() == other.codespace() && self.code() == other.code()
    }
}

/// Errors raised while parsing or decoding shared identifiers and coins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("name too long: {0} chars")]
    NameTooLong(usize),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid store key length {0}")]
    InvalidStoreKey(usize),

    #[error("unknown account id tag {0}")]
    UnknownAccountTag(u8),

    #[error("invalid denom: {0:?}")]
    InvalidDenom(String),

    #[error("invalid coins: {0}")]
    InvalidCoins(String),

    #[error("invalid decimal: {0:?}")]
    InvalidDec(String),
}
