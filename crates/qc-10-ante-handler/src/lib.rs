//! # qc-10-ante-handler
//!
//! Admission checks run before any message of a transaction executes:
//! shape, fees, gas for size, signatures and replay protection.
//!
//! ## Layers
//!
//! | Layer | Contents |
//! |-------|----------|
//! | `domain` | tx shape, gas meter, context, config, errors |
//! | `ports` | `AnteApi` in; accounts, fees, signatures, plugins out |
//! | `decorators` | the nine stages |
//! | `adapters` | store-backed accounts, ledger fee keeper, secp256k1 |
//! | `service` | [`AnteHandler`], the chain driver |
//!
//! ## Modes
//!
//! - **Check**: mempool admission; enforces node minimum gas prices
//! - **ReCheck**: re-admission after a block; skips shape and signature checks
//! - **Deliver**: block execution; runs plugins
//!
//! A failed stage aborts the chain. State changes made by earlier stages are
//! rolled back by the caller, which runs the chain against a cached store.

pub mod adapters;
pub mod decorators;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{
    AuthRecord, InMemoryAccountKeeper, LedgerFeeKeeper, Secp256k1Signer, Secp256k1Verifier,
    StoreAccountKeeper,
};
pub use decorators::{AnteDecorator, Flow};
pub use domain::config::AnteConfig;
pub use domain::context::{AnteContext, ExecMode};
pub use domain::errors::AnteError;
pub use domain::gas::GasMeter;
pub use domain::tx::{FeeTx, Msg, PubKey, SigVerifiableTx, StdFee, StdSignature, StdTx, Tx};
pub use ports::{AccountKeeper, AnteApi, FeeKeeper, NoopPlugin, PluginHook, SignatureVerifier};
pub use service::AnteHandler;
