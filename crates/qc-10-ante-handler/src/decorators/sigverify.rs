use super::{sig_tx, AnteDecorator, Flow};
use crate::domain::context::AnteContext;
use crate::domain::errors::AnteError;
use crate::domain::tx::Tx;
use crate::ports::outbound::{AccountKeeper, SignatureVerifier};
use quantum_telemetry::{metric_inc, SIGNATURE_VERIFICATIONS};
use std::sync::Arc;

/// Stores the public key carried by each signature on its signer's auth.
///
/// Signatures without a key rely on the one stored earlier. Nothing is
/// stored while simulating.
pub struct SetPubKeyDecorator<A: AccountKeeper, V: SignatureVerifier> {
    accounts: Arc<A>,
    verifier: Arc<V>,
}

impl<A: AccountKeeper, V: SignatureVerifier> SetPubKeyDecorator<A, V> {
    pub fn new(accounts: Arc<A>, verifier: Arc<V>) -> Self {
        Self { accounts, verifier }
    }
}

impl<A: AccountKeeper, V: SignatureVerifier> AnteDecorator for SetPubKeyDecorator<A, V> {
    fn name(&self) -> &'static str {
        "set_pubkey"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext,
        tx: &dyn Tx,
        simulate: bool,
    ) -> Result<Flow, AnteError> {
        let sig_tx = sig_tx(tx, "set_pubkey")?;
        if simulate {
            return Ok(Flow::Continue);
        }

        let signers = sig_tx.signers();
        for (i, sig) in sig_tx.signatures().iter().enumerate() {
            let Some(pub_key) = &sig.pub_key else {
                continue;
            };
            let signer = signers.get(i).ok_or_else(|| {
                AnteError::Unauthorized(format!("signature {} has no signer", i))
            })?;
            if self.verifier.address(pub_key)? != *signer {
                return Err(AnteError::InvalidPubKey(format!(
                    "pubKey does not match signer address {} with signer index: {}",
                    signer, i
                )));
            }
            self.accounts.set_pub_key(&ctx.block, signer, pub_key.clone())?;
        }
        Ok(Flow::Continue)
    }
}

/// Verifies every signature over the signer's sign bytes; skipped on recheck.
pub struct SigVerificationDecorator<A: AccountKeeper, V: SignatureVerifier> {
    accounts: Arc<A>,
    verifier: Arc<V>,
    chain_id: String,
}

impl<A: AccountKeeper, V: SignatureVerifier> SigVerificationDecorator<A, V> {
    pub fn new(accounts: Arc<A>, verifier: Arc<V>, chain_id: impl Into<String>) -> Self {
        Self {
            accounts,
            verifier,
            chain_id: chain_id.into(),
        }
    }
}

impl<A: AccountKeeper, V: SignatureVerifier> AnteDecorator for SigVerificationDecorator<A, V> {
    fn name(&self) -> &'static str {
        "sig_verify"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext,
        tx: &dyn Tx,
        simulate: bool,
    ) -> Result<Flow, AnteError> {
        if ctx.is_recheck_tx() {
            return Ok(Flow::Continue);
        }
        let sig_tx = sig_tx(tx, "sig_verify")?;

        let sigs = sig_tx.signatures();
        let signers = sig_tx.signers();
        if sigs.len() != signers.len() {
            return Err(AnteError::Unauthorized(format!(
                "invalid number of signer; expected: {}, got {}",
                signers.len(),
                sigs.len()
            )));
        }

        for (sig, signer) in sigs.iter().zip(&signers) {
            let (sequence, account_number) = self.accounts.get_auth_sequence(&ctx.block, signer)?;
            let sign_bytes = sig_tx.sign_bytes(&self.chain_id, account_number, sequence)?;
            if simulate {
                continue;
            }

            let pub_key = sig
                .pub_key
                .clone()
                .or_else(|| self.accounts.get_pub_key(&ctx.block, signer))
                .ok_or_else(|| AnteError::InvalidPubKey("pubkey on account is not set".into()))?;

            let valid = self.verifier.verify(&pub_key, &sign_bytes, &sig.signature);
            let result = if valid { "valid" } else { "invalid" };
            metric_inc!(SIGNATURE_VERIFICATIONS, &["secp256k1", result]);
            if !valid {
                return Err(AnteError::Unauthorized(
                    "signature verification failed; verify correct account sequence and chain-id"
                        .into(),
                ));
            }
        }
        Ok(Flow::Continue)
    }
}

/// Bumps every signer's sequence by one; skipped on recheck unless simulating.
pub struct IncrementSequenceDecorator<A: AccountKeeper> {
    accounts: Arc<A>,
}

impl<A: AccountKeeper> IncrementSequenceDecorator<A> {
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }
}

impl<A: AccountKeeper> AnteDecorator for IncrementSequenceDecorator<A> {
    fn name(&self) -> &'static str {
        "inc_sequence"
    }

    fn ante_handle(
        &self,
        ctx: &mut AnteContext,
        tx: &dyn Tx,
        simulate: bool,
    ) -> Result<Flow, AnteError> {
        if ctx.is_recheck_tx() && !simulate {
            return Ok(Flow::Continue);
        }
        let sig_tx = sig_tx(tx, "inc_sequence")?;
        for signer in sig_tx.signers() {
            self.accounts.inc_auth_sequence(&ctx.block, &signer)?;
        }
        Ok(Flow::Continue)
    }
}
