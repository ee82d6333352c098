use super::{fee_tx, sig_tx, AnteDecorator, Flow};
use crate::domain::context::AnteContext;
use crate::domain::errors::AnteError;
use crate::domain::tx::Tx;
use crate::ports::outbound::{AccountKeeper, FeeKeeper};
use shared_types::{AccountId, Address, DecCoins};
use std::sync::Arc;
use tracing::debug;

/// Rejects check txs whose fee is below the node's minimum gas prices.
///
/// The required fee per denom is `ceil(price * gas_limit)`; covering any
/// one of them is enough.
pub struct MempoolFeeDecorator {
    min_gas_prices: DecCoins,
}

impl MempoolFeeDecorator {
    pub fn new(min_gas_prices: DecCoins) -> Self {
        Self { min_gas_prices }
    }
}

impl AnteDecorator for MempoolFeeDecorator {
    fn name(&self) -> &'static str {
        "mempool_fee"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext,
        tx: &dyn Tx,
        simulate: bool,
    ) -> Result<Flow, AnteError> {
        let fee_tx = fee_tx(tx, "mempool_fee")?;

        if !ctx.is_check_tx() || simulate || self.min_gas_prices.is_zero() {
            return Ok(Flow::Continue);
        }

        let required = self
            .min_gas_prices
            .required_fees(fee_tx.gas())
            .ok_or_else(|| AnteError::InsufficientFee("required fee overflows".into()))?;
        if !required.is_zero() && !fee_tx.fee().is_any_gte(&required) {
            return Err(AnteError::InsufficientFee(format!(
                "insufficient fees; got: {} required: {}",
                fee_tx.fee(),
                required
            )));
        }
        Ok(Flow::Continue)
    }
}

/// Debits the fee from the payer into the fee collector's coin power.
///
/// The payer is `fee.payer` when set, otherwise the first signer, and must
/// be authorized by one of the tx signers.
pub struct DeductFeeDecorator<A: AccountKeeper, F: FeeKeeper> {
    accounts: Arc<A>,
    fees: F,
}

impl<A: AccountKeeper, F: FeeKeeper> DeductFeeDecorator<A, F> {
    pub fn new(accounts: Arc<A>, fees: F) -> Self {
        Self { accounts, fees }
    }

    fn check_payer_auth(
        &self,
        ctx: &AnteContext,
        tx: &dyn Tx,
        payer: &AccountId,
    ) -> Result<(), AnteError> {
        let signers = sig_tx(tx, "deduct_fee")?.signers();
        let has_auth = |auth: &Address| signers.contains(auth);

        match payer {
            AccountId::Address(addr) => {
                if !has_auth(addr) {
                    return Err(AnteError::Unauthorized(
                        "signature verification failed; fee payer address not found".into(),
                    ));
                }
                Ok(())
            }
            AccountId::Name(name) => {
                let auth = self
                    .accounts
                    .get_auth(&ctx.block, name)
                    .ok_or_else(|| AnteError::UnknownAddress(format!("payer {} not found", name)))?;
                if !has_auth(&auth) {
                    return Err(AnteError::Unauthorized(
                        "signature verification failed; fee payer account auth not found".into(),
                    ));
                }
                Ok(())
            }
            AccountId::Empty => Err(AnteError::UnknownAddress("fee payer is empty".into())),
        }
    }
}

impl<A: AccountKeeper, F: FeeKeeper> AnteDecorator for DeductFeeDecorator<A, F> {
    fn name(&self) -> &'static str {
        "deduct_fee"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext,
        tx: &dyn Tx,
        _simulate: bool,
    ) -> Result<Flow, AnteError> {
        let fee_tx = fee_tx(tx, "deduct_fee")?;
        let payer = fee_tx.fee_payer();
        let fee = fee_tx.fee();
        debug!(module = "ante", %payer, %fee, gas = fee_tx.gas(), "fee deduct");

        if fee.is_zero() {
            return Ok(Flow::Continue);
        }

        self.check_payer_auth(ctx, tx, &payer)?;
        self.fees
            .pay_fee(&ctx.block, &payer, fee)
            .map_err(|e| e.wrap(format!("deduct fee from {}", payer)))?;
        Ok(Flow::Continue)
    }
}
