//! # qc-04-asset-ledger
//!
//! Coin ledger of the chain: the only writer of balances, coin power,
//! lock schedules, allowances and per-denom supply statistics.
//!
//! ## Namespaces
//!
//! | Key space | Value | Written by |
//! |-----------|-------|------------|
//! | `coin` | `Coins` balance | transfer, issue, burn, exercise |
//! | `coin.power` | `Coins` power | coins-to-power, send, exercise |
//! | `coin.lock` | locked sum | lock, unlock |
//! | `coin.locks` | `AccountLockedCoins` | lock, unlock |
//! | `coin.stat` | `CoinStat` | create, issue, burn |
//! | `coin.desc` | `CoinDescription` | create |
//! | `coin.approve` | `ApproveData` | approve, transfer-from-approve |
//! | `coin.approvesum` | `Coins` | approve, transfer-from-approve |
//!
//! ## Atomicity
//!
//! Every keeper mutation validates first and stages its writes; nothing
//! reaches the store unless the whole operation succeeds. Callers that
//! need to discard a whole transaction run it against a [`CacheStore`].

pub mod adapters;
pub mod domain;
pub mod events;
pub mod handler;
pub mod ports;
pub mod service;

pub use adapters::{CacheStore, MemoryStore};
pub use domain::*;
pub use events::Event;
pub use handler::{AssetHandler, AssetMsg, ROUTER_KEY};
pub use ports::*;
pub use service::AssetKeeper;
