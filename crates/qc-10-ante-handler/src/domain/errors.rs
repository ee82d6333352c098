//! # Ante Errors
//!
//! Errors surfaced by the ante chain. Codes live in the `sdk` codespace;
//! ledger failures raised while paying the fee keep their `asset` code.

use qc_04_asset_ledger::AssetError;
use shared_types::ErrorCode;
use thiserror::Error;

/// Codespace of the ante chain's own errors.
pub const SDK_CODESPACE: &str = "sdk";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnteError {
    /// The transaction does not expose an interface a stage needs.
    #[error("tx decode error: {0}")]
    TxDecode(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("unknown request: {0}")]
    UnknownRequest(String),

    #[error("invalid pubkey: {0}")]
    InvalidPubKey(String),

    #[error("unknown address: {0}")]
    UnknownAddress(String),

    /// Gas meter exhausted.
    #[error("out of gas in location: {descriptor}; gasWanted: {limit}, gasUsed: {used}")]
    OutOfGas {
        descriptor: String,
        limit: u64,
        used: u64,
    },

    #[error("memo too large: {len} > {max} characters")]
    MemoTooLarge { len: usize, max: usize },

    #[error("insufficient fee: {0}")]
    InsufficientFee(String),

    #[error("too many signatures: {got} > {limit}")]
    TooManySignatures { got: usize, limit: usize },

    #[error("no signatures supplied")]
    NoSignatures,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Error raised by the coin ledger.
    #[error(transparent)]
    Ledger(#[from] AssetError),

    #[error("{context}: {source}")]
    Wrapped {
        context: String,
        #[source]
        source: Box<AnteError>,
    },
}

impl AnteError {
    /// Add context while keeping the registered code of `self`.
    pub fn wrap(self, context: impl Into<String>) -> Self {
        AnteError::Wrapped {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost (registered) error.
    pub fn root(&self) -> &AnteError {
        match self {
            AnteError::Wrapped { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_out_of_gas(&self) -> bool {
        matches!(self.root(), AnteError::OutOfGas { .. })
    }
}

impl ErrorCode for AnteError {
    fn codespace(&self) -> &'static str {
        match self.root() {
            AnteError::Ledger(e) => e.codespace(),
            _ => SDK_CODESPACE,
        }
    }

    fn code(&self) -> u32 {
        match self.root() {
            AnteError::TxDecode(_) => 2,
            AnteError::Unauthorized(_) => 4,
            AnteError::InsufficientFunds(_) => 5,
            AnteError::UnknownRequest(_) => 6,
            AnteError::InvalidPubKey(_) => 8,
            AnteError::UnknownAddress(_) => 9,
            AnteError::OutOfGas { .. } => 11,
            AnteError::MemoTooLarge { .. } => 12,
            AnteError::InsufficientFee(_) => 13,
            AnteError::TooManySignatures { .. } => 15,
            AnteError::NoSignatures => 16,
            AnteError::InvalidRequest(_) => 18,
            AnteError::Ledger(e) => e.code(),
            // root() never returns Wrapped
            AnteError::Wrapped { .. } => 0,
        }
    }
}
