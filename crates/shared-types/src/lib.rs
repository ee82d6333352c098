//! # Shared Types Crate
//!
//! Identifiers, amounts and error-code contracts shared by the asset
//! ledger and the ante handler chain.
//!
//! ## Contents
//!
//! | Module       | Types                                   |
//! |--------------|-----------------------------------------|
//! | `name`       | [`Name`]: packed 17-byte account names  |
//! | `account_id` | [`Address`], [`AccountId`]              |
//! | `coins`      | [`Coin`], [`Coins`], denom helpers      |
//! | `dec`        | [`Dec`], [`DecCoin`], [`DecCoins`]      |
//! | `context`    | [`BlockContext`]                        |
//! | `errors`     | [`ErrorCode`], [`IdentifierError`]      |
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identifier encodings used in store keys
//!   are defined here and nowhere else.
//! - **Canonical amounts**: [`Coins`] never holds zero or duplicate entries;
//!   arithmetic that would break this returns `None`.

pub mod account_id;
pub mod coins;
pub mod context;
pub mod dec;
pub mod errors;
pub mod name;

pub use account_id::{AccountId, Address, ACCOUNT_ID_STORE_KEY_LEN, ADDRESS_LEN};
pub use coins::{coin_denom, split_denom, validate_denom, Coin, Coins};
pub use context::BlockContext;
pub use dec::{Dec, DecCoin, DecCoins};
pub use errors::{ErrorCode, IdentifierError};
pub use name::{verify_name_string, Name};
