use super::{sig_tx, AnteDecorator, Flow};
use crate::domain::config::AnteConfig;
use crate::domain::context::AnteContext;
use crate::domain::errors::AnteError;
use crate::domain::tx::{StdSignature, Tx, SIM_PUB_KEY_LEN, SIM_SIGNATURE_LEN};
use std::sync::Arc;

/// Runs the transaction's stateless checks; skipped on recheck.
pub struct ValidateBasicDecorator {
    config: Arc<AnteConfig>,
}

impl ValidateBasicDecorator {
    pub fn new(config: Arc<AnteConfig>) -> Self {
        Self { config }
    }
}

impl AnteDecorator for ValidateBasicDecorator {
    fn name(&self) -> &'static str {
        "validate_basic"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext,
        tx: &dyn Tx,
        _simulate: bool,
    ) -> Result<Flow, AnteError> {
        // already passed on the first check
        if ctx.is_recheck_tx() {
            return Ok(Flow::Continue);
        }
        tx.validate_basic(&self.config)?;
        Ok(Flow::Continue)
    }
}

/// Charges gas per transaction byte.
///
/// When simulating, every signature slot is charged as if it carried a
/// full public key and signature, so estimates never come in low.
pub struct ConsumeTxSizeGasDecorator {
    gas_tx_size_price: u64,
}

impl ConsumeTxSizeGasDecorator {
    pub fn new(gas_tx_size_price: u64) -> Self {
        Self { gas_tx_size_price }
    }
}

fn simulated_padding(sig: &StdSignature) -> u64 {
    let key = if sig.pub_key.is_none() { SIM_PUB_KEY_LEN } else { 0 };
    let signature = if sig.signature.is_empty() { SIM_SIGNATURE_LEN } else { 0 };
    key + signature
}

impl AnteDecorator for ConsumeTxSizeGasDecorator {
    fn name(&self) -> &'static str {
        "tx_size"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext,
        tx: &dyn Tx,
        simulate: bool,
    ) -> Result<Flow, AnteError> {
        let sig_tx = sig_tx(tx, "tx_size")?;

        let mut size = ctx.tx_bytes.len() as u64;
        if simulate {
            size += sig_tx.signatures().iter().map(simulated_padding).sum::<u64>();
        }

        ctx.gas_meter_mut()
            .consume_gas(self.gas_tx_size_price.saturating_mul(size), "txSize")?;
        Ok(Flow::Continue)
    }
}
