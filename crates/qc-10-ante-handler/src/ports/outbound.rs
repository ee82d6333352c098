//! # Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators the ante stages call into.

use crate::domain::errors::AnteError;
use crate::domain::tx::{PubKey, Tx};
use shared_types::{AccountId, Address, BlockContext, Coins, Name};
use std::sync::Arc;

/// Account records: auth addresses, their sequences and public keys.
pub trait AccountKeeper: Send + Sync {
    /// Address authorized to act for `name`; `None` when no such account.
    fn get_auth(&self, ctx: &BlockContext, name: &Name) -> Option<Address>;

    /// `(sequence, account_number)` of an auth address, provisioning the
    /// record on first use. Genesis transactions are signed over `(0, 0)`.
    fn get_auth_sequence(&self, ctx: &BlockContext, auth: &Address) -> Result<(u64, u64), AnteError>;

    /// Bump the sequence of `auth` by exactly one.
    fn inc_auth_sequence(&self, ctx: &BlockContext, auth: &Address) -> Result<(), AnteError>;

    fn get_pub_key(&self, ctx: &BlockContext, auth: &Address) -> Option<PubKey>;

    fn set_pub_key(&self, ctx: &BlockContext, auth: &Address, pub_key: PubKey) -> Result<(), AnteError>;
}

/// Ledger side of fee payment.
pub trait FeeKeeper: Send + Sync {
    /// Move `fee` out of `payer`'s spendable balance into the ledger's fee
    /// collector.
    fn pay_fee(&self, ctx: &BlockContext, payer: &AccountId, fee: &Coins) -> Result<(), AnteError>;
}

/// Signature primitive.
pub trait SignatureVerifier: Send + Sync {
    /// Address a public key controls.
    fn address(&self, pub_key: &PubKey) -> Result<Address, AnteError>;

    fn verify(&self, pub_key: &PubKey, msg: &[u8], signature: &[u8]) -> bool;
}

/// Side effects run on delivered transactions only.
pub trait PluginHook: Send + Sync {
    fn handle_tx(&self, ctx: &BlockContext, tx: &dyn Tx);
}

/// Hook that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPlugin;

impl PluginHook for NoopPlugin {
    fn handle_tx(&self, _ctx: &BlockContext, _tx: &dyn Tx) {}
}

impl<T: FeeKeeper + ?Sized> FeeKeeper for Arc<T> {
    fn pay_fee(&self, ctx: &BlockContext, payer: &AccountId, fee: &Coins) -> Result<(), AnteError> {
        (**self).pay_fee(ctx, payer, fee)
    }
}

impl<T: SignatureVerifier + ?Sized> SignatureVerifier for Arc<T> {
    fn address(&self, pub_key: &PubKey) -> Result<Address, AnteError> {
        (**self).address(pub_key)
    }

    fn verify(&self, pub_key: &PubKey, msg: &[u8], signature: &[u8]) -> bool {
        (**self).verify(pub_key, msg, signature)
    }
}
