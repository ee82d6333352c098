//! Per-transaction execution context threaded through the ante stages.

use super::gas::GasMeter;
use shared_types::BlockContext;
use std::fmt;

/// Which ABCI path is running the transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExecMode {
    /// First admission into the mempool.
    Check,
    /// Re-admission of a mempool tx after a block commit.
    ReCheck,
    /// Block execution.
    Deliver,
}

impl ExecMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecMode::Check => "check",
            ExecMode::ReCheck => "recheck",
            ExecMode::Deliver => "deliver",
        }
    }
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context of one transaction.
#[derive(Clone, Debug)]
pub struct AnteContext {
    pub block: BlockContext,
    pub mode: ExecMode,
    /// Raw transaction bytes as received.
    pub tx_bytes: Vec<u8>,
    gas_meter: GasMeter,
}

impl AnteContext {
    pub fn new(block: BlockContext, mode: ExecMode, tx_bytes: Vec<u8>) -> Self {
        Self {
            block,
            mode,
            tx_bytes,
            gas_meter: GasMeter::infinite(),
        }
    }

    /// True for both check and recheck.
    pub fn is_check_tx(&self) -> bool {
        matches!(self.mode, ExecMode::Check | ExecMode::ReCheck)
    }

    pub fn is_recheck_tx(&self) -> bool {
        self.mode == ExecMode::ReCheck
    }

    pub fn height(&self) -> i64 {
        self.block.height
    }

    pub fn gas_meter(&self) -> &GasMeter {
        &self.gas_meter
    }

    pub fn gas_meter_mut(&mut self) -> &mut GasMeter {
        &mut self.gas_meter
    }

    pub fn set_gas_meter(&mut self, meter: GasMeter) {
        self.gas_meter = meter;
    }
}
