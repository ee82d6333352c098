//! # Ante Stages
//!
//! Each stage is an independent [`AnteDecorator`]; the chain in
//! [`crate::service`] runs them in this order:
//!
//! | # | Stage | Skipped when |
//! |---|-------|--------------|
//! | 1 | [`SetUpContextDecorator`] | never |
//! | 2 | [`ValidateBasicDecorator`] | recheck |
//! | 3 | [`MempoolFeeDecorator`] | not check, or simulating |
//! | 4 | [`ConsumeTxSizeGasDecorator`] | never |
//! | 5 | [`DeductFeeDecorator`] | fee is zero |
//! | 6 | [`SetPubKeyDecorator`] | simulating |
//! | 7 | [`SigVerificationDecorator`] | recheck |
//! | 8 | [`IncrementSequenceDecorator`] | recheck without simulate |
//! | 9 | [`PluginDecorator`] | check without simulate |

mod basic;
mod fee;
mod plugin;
mod setup;
mod sigverify;

pub use basic::{ConsumeTxSizeGasDecorator, ValidateBasicDecorator};
pub use fee::{DeductFeeDecorator, MempoolFeeDecorator};
pub use plugin::PluginDecorator;
pub use setup::SetUpContextDecorator;
pub use sigverify::{IncrementSequenceDecorator, SetPubKeyDecorator, SigVerificationDecorator};

use crate::domain::context::AnteContext;
use crate::domain::errors::AnteError;
use crate::domain::tx::{FeeTx, SigVerifiableTx, Tx};

/// What the chain does after a stage succeeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Accept the transaction without running later stages.
    Stop,
}

/// One stage of the ante chain.
pub trait AnteDecorator: Send + Sync {
    /// Label used in logs and metrics.
    fn name(&self) -> &'static str;

    fn ante_handle(
        &self,
        ctx: &mut AnteContext,
        tx: &dyn Tx,
        simulate: bool,
    ) -> Result<Flow, AnteError>;
}

pub(crate) fn fee_tx<'a>(tx: &'a dyn Tx, stage: &str) -> Result<&'a dyn FeeTx, AnteError> {
    tx.as_fee_tx()
        .ok_or_else(|| AnteError::TxDecode(format!("{}: tx must be a FeeTx", stage)))
}

pub(crate) fn sig_tx<'a>(tx: &'a dyn Tx, stage: &str) -> Result<&'a dyn SigVerifiableTx, AnteError> {
    tx.as_sig_verifiable()
        .ok_or_else(|| AnteError::TxDecode(format!("{}: invalid transaction type for SigVerifiableTx", stage)))
}
