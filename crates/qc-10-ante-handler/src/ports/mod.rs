//! # Ports Layer
//!
//! - **Inbound (Driving)**: the chain entry point callers use
//! - **Outbound (Driven)**: accounts, fee ledger, signature primitive, plugins

pub mod inbound;
pub mod outbound;

pub use inbound::AnteApi;
pub use outbound::{AccountKeeper, FeeKeeper, NoopPlugin, PluginHook, SignatureVerifier};
