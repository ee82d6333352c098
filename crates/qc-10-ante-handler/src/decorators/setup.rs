use super::{fee_tx, AnteDecorator, Flow};
use crate::domain::context::AnteContext;
use crate::domain::errors::AnteError;
use crate::domain::gas::GasMeter;
use crate::domain::tx::Tx;

/// Installs the gas meter bounded by the fee's gas limit.
///
/// Genesis (height 0) runs unmetered. Every later stage charges this meter
/// and reports exhaustion as `OutOfGas`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SetUpContextDecorator;

impl AnteDecorator for SetUpContextDecorator {
    fn name(&self) -> &'static str {
        "setup"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext,
        tx: &dyn Tx,
        _simulate: bool,
    ) -> Result<Flow, AnteError> {
        let fee_tx = fee_tx(tx, "setup")?;
        let meter = if ctx.block.is_genesis() {
            GasMeter::infinite()
        } else {
            GasMeter::limited(fee_tx.gas())
        };
        ctx.set_gas_meter(meter);
        Ok(Flow::Continue)
    }
}
