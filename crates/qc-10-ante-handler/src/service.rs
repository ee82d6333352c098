//! # Ante Handler Service
//!
//! Drives the stages in order, stopping at the first error, and records
//! the outcome.
//!
//! ## Architecture
//!
//! - Implements the inbound port (`AnteApi`)
//! - Stages reach accounts, the fee ledger, the signature primitive and
//!   plugins only through the outbound ports

use crate::decorators::{
    AnteDecorator, ConsumeTxSizeGasDecorator, DeductFeeDecorator, Flow, IncrementSequenceDecorator,
    MempoolFeeDecorator, PluginDecorator, SetPubKeyDecorator, SetUpContextDecorator,
    SigVerificationDecorator, ValidateBasicDecorator,
};
use crate::domain::config::AnteConfig;
use crate::domain::context::{AnteContext, ExecMode};
use crate::domain::errors::AnteError;
use crate::domain::tx::Tx;
use crate::ports::inbound::AnteApi;
use crate::ports::outbound::{AccountKeeper, FeeKeeper, PluginHook, SignatureVerifier};
use quantum_telemetry::{
    log_tx_event, metric_inc, metric_observe, ANTE_GAS_CONSUMED, ANTE_TX_ADMITTED,
    ANTE_TX_REJECTED,
};
use shared_types::ErrorCode;
use std::sync::Arc;
use tracing::trace;

/// The ante chain.
pub struct AnteHandler {
    decorators: Vec<Box<dyn AnteDecorator>>,
}

impl AnteHandler {
    /// The standard nine-stage chain.
    pub fn new<A, F, V, P>(
        config: AnteConfig,
        accounts: Arc<A>,
        fees: F,
        verifier: Arc<V>,
        plugin: P,
    ) -> Self
    where
        A: AccountKeeper + 'static,
        F: FeeKeeper + 'static,
        V: SignatureVerifier + 'static,
        P: PluginHook + 'static,
    {
        let config = Arc::new(config);
        Self::from_decorators(vec![
            Box::new(SetUpContextDecorator),
            Box::new(ValidateBasicDecorator::new(config.clone())),
            Box::new(MempoolFeeDecorator::new(config.min_gas_prices.clone())),
            Box::new(ConsumeTxSizeGasDecorator::new(config.gas_tx_size_price)),
            Box::new(DeductFeeDecorator::new(accounts.clone(), fees)),
            Box::new(SetPubKeyDecorator::new(accounts.clone(), verifier.clone())),
            Box::new(SigVerificationDecorator::new(
                accounts.clone(),
                verifier,
                config.chain_id.clone(),
            )),
            Box::new(IncrementSequenceDecorator::new(accounts)),
            Box::new(PluginDecorator::new(plugin)),
        ])
    }

    /// A chain of arbitrary stages, run in the given order.
    pub fn from_decorators(decorators: Vec<Box<dyn AnteDecorator>>) -> Self {
        Self { decorators }
    }

    /// Stage names in run order.
    pub fn stages(&self) -> Vec<&'static str> {
        self.decorators.iter().map(|d| d.name()).collect()
    }

    fn reject(&self, ctx: &AnteContext, stage: &'static str, err: &AnteError) {
        metric_inc!(ANTE_TX_REJECTED, &[stage, err.codespace()]);
        let (mode, code) = (ctx.mode.as_str(), err.code());
        if ctx.mode == ExecMode::Deliver {
            log_tx_event!(warn, "ante", "tx rejected", ctx.height(), stage, mode, code, error = %err);
        } else {
            log_tx_event!(debug, "ante", "tx rejected", ctx.height(), stage, mode, code, error = %err);
        }
    }
}

impl AnteApi for AnteHandler {
    fn ante(&self, ctx: &mut AnteContext, tx: &dyn Tx, simulate: bool) -> Result<(), AnteError> {
        for stage in &self.decorators {
            trace!(module = "ante", stage = stage.name(), mode = ctx.mode.as_str(), simulate, "ante stage");
            match stage.ante_handle(ctx, tx, simulate) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Stop) => break,
                Err(err) => {
                    self.reject(ctx, stage.name(), &err);
                    return Err(err);
                }
            }
        }

        metric_inc!(ANTE_TX_ADMITTED, &[ctx.mode.as_str()]);
        metric_observe!(ANTE_GAS_CONSUMED, ctx.gas_meter().consumed() as f64);
        Ok(())
    }
}
