//! # Adapters
//!
//! Port implementations shipped with the chain.

pub mod accounts;
pub mod ledger;
pub mod secp256k1;

pub use accounts::{AuthRecord, InMemoryAccountKeeper, StoreAccountKeeper};
pub use ledger::LedgerFeeKeeper;
pub use secp256k1::{address_from_verifying_key, keccak256, Secp256k1Signer, Secp256k1Verifier};
