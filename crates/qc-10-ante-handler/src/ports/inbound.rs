//! # Inbound Port (Driving Port / API)

use crate::domain::context::AnteContext;
use crate::domain::errors::AnteError;
use crate::domain::tx::Tx;

/// Admission check run before any message of `tx` executes.
pub trait AnteApi: Send + Sync {
    /// Run every stage in order, stopping at the first error.
    ///
    /// On success `ctx` carries the gas meter installed for the transaction,
    /// with the ante gas already charged.
    fn ante(&self, ctx: &mut AnteContext, tx: &dyn Tx, simulate: bool) -> Result<(), AnteError>;
}
