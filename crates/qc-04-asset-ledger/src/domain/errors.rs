//! Asset module errors.
//!
//! Codes are stable and consensus-visible: clients match on
//! `(codespace, code)`, never on the message.

use shared_types::{ErrorCode, IdentifierError};
use thiserror::Error;

/// Codespace of every asset error.
pub const ASSET_CODESPACE: &str = "asset";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("coin has created: {0}")]
    HasCreated(String),

    #[error("denom error: {0}")]
    Denom(String),

    #[error("coin description too large: {len} > {max}")]
    DescriptorTooLarge { len: usize, max: usize },

    #[error("issue exceeds max supply: {denom} supply {supply} > limit {limit}")]
    IssueGTMaxSupply { denom: String, supply: u128, limit: u128 },

    #[error("coin creator mismatch for {0}")]
    NoCreator(String),

    #[error("coin does not exist: {0}")]
    CoinNoExit(String),

    #[error("coins not enough: {0}")]
    CoinNoEnough(String),

    #[error("from account is empty")]
    FromAccountEmpty,

    #[error("to account is empty")]
    ToAccountEmpty,

    #[error("coins not enough to lock: {0}")]
    LockCoinsNoEnough(String),

    #[error("unlock height {unlock_height} must be greater than current height {current}")]
    LockUnlockBlockHeightErr { unlock_height: i64, current: i64 },

    #[error("unlock coins error: {0}")]
    UnLockCoins(String),

    #[error("coins are locked: {0}")]
    CoinsLocked(String),

    #[error("coin cannot be locked: {0}")]
    CoinCannotBeLock(String),

    #[error("coin cannot be issued: {0}")]
    CoinCannotBeIssue(String),

    #[error("coin cannot be issued at height {0}")]
    CannotBeIssueInHeight(i64),

    #[error("coin must be issuable when issued by block")]
    MustCanIssueWhenIssueByBlock,

    #[error("max supply must be greater than init supply")]
    MaxSupplyNeedGTInitSupply,

    #[error("issue-to height must be greater than create height")]
    IssueToHeightMustGTCurrentHeight,

    #[error("symbol error: {0}")]
    SymbolError(String),

    #[error("amount should not be zero")]
    CoinNoZero,

    #[error("coin cannot be burned: {0}")]
    CoinCannotBeBurn(String),

    #[error("max supply should be greater than or equal to init supply")]
    MaxSupplyShouldGTEInitSupply,

    #[error("locked approval cannot be changed")]
    ApproveCannotChangeLock,

    #[error("codec error: {0}")]
    Codec(String),

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("{context}: {source}")]
    Wrapped {
        context: String,
        #[source]
        source: Box<AssetError>,
    },
}

impl AssetError {
    /// Add context while keeping the registered code of `self`.
    pub fn wrap(self, context: impl Into<String>) -> Self {
        AssetError::Wrapped {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost (registered) error.
    pub fn root(&self) -> &AssetError {
        match self {
            AssetError::Wrapped { source, .. } => source.root(),
            other => other,
        }
    }
}

impl ErrorCode for AssetError {
    fn codespace(&self) -> &'static str {
        ASSET_CODESPACE
    }

    fn code(&self) -> u32 {
        match self.root() {
            AssetError::HasCreated(_) => 1,
            AssetError::Denom(_) => 2,
            AssetError::DescriptorTooLarge { .. } => 3,
            AssetError::IssueGTMaxSupply { .. } => 4,
            AssetError::NoCreator(_) => 5,
            AssetError::CoinNoExit(_) => 6,
            AssetError::CoinNoEnough(_) => 7,
            AssetError::FromAccountEmpty => 8,
            AssetError::ToAccountEmpty => 9,
            AssetError::LockCoinsNoEnough(_) => 10,
            AssetError::LockUnlockBlockHeightErr { .. } => 11,
            AssetError::UnLockCoins(_) => 12,
            AssetError::CoinsLocked(_) => 13,
            AssetError::CoinCannotBeLock(_) => 14,
            AssetError::CoinCannotBeIssue(_) => 15,
            AssetError::CannotBeIssueInHeight(_) => 16,
            AssetError::MustCanIssueWhenIssueByBlock => 17,
            AssetError::MaxSupplyNeedGTInitSupply => 18,
            AssetError::IssueToHeightMustGTCurrentHeight => 19,
            AssetError::SymbolError(_) => 20,
            AssetError::CoinNoZero => 21,
            AssetError::CoinCannotBeBurn(_) => 22,
            AssetError::MaxSupplyShouldGTEInitSupply => 23,
            AssetError::ApproveCannotChangeLock => 24,
            AssetError::Codec(_) => 25,
            AssetError::Overflow(_) => 26,
            AssetError::Unauthorized(_) => 27,
            // root() never returns Wrapped
            AssetError::Wrapped { .. } => 0,
        }
    }
}

impl From<IdentifierError> for AssetError {
    fn from(e: IdentifierError) -> Self {
        match e {
            IdentifierError::InvalidDenom(d) => AssetError::Denom(d),
            IdentifierError::InvalidCoins(msg) => AssetError::Denom(msg),
            other => AssetError::SymbolError(other.to_string()),
        }
    }
}
