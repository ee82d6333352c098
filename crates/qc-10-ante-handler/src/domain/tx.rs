//! # Transaction Shape
//!
//! `StdTx` and the capability traits the ante stages query it through.
//! A stage asks for the view it needs ([`FeeTx`], [`SigVerifiableTx`]) and
//! fails with `TxDecode` when the transaction does not provide it.

use super::config::AnteConfig;
use super::errors::AnteError;
use serde::{Deserialize, Serialize};
use shared_types::{AccountId, Address, Coins};
use std::fmt;

/// Maximum auth addresses carried by one message.
pub const MSG_MAX_AUTH: usize = 3;
/// Maximum payload bytes carried by one message.
pub const MSG_MAX_DATA_LEN: usize = 1024;
/// Compressed secp256k1 public key length.
pub const SIM_PUB_KEY_LEN: u64 = 33;
/// Compact `r || s` signature length.
pub const SIM_SIGNATURE_LEN: u64 = 64;

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(v))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// KEYS AND SIGNATURES
// =============================================================================

/// Encoded public key bytes (compressed secp256k1 for the shipped verifier).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PubKey(#[serde(with = "hex_bytes")] pub Vec<u8>);

impl PubKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKey({})", hex::encode(&self.0))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    /// Omitted once the signer's key is stored on its account.
    pub pub_key: Option<PubKey>,
    #[serde(with = "hex_bytes")]
    pub signature: Vec<u8>,
}

impl StdSignature {
    pub fn new(pub_key: Option<PubKey>, signature: Vec<u8>) -> Self {
        Self { pub_key, signature }
    }
}

// =============================================================================
// MESSAGE
// =============================================================================

/// Routed message envelope.
///
/// Fields are declared in lexical order so the JSON sign bytes are sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Msg {
    pub action: String,
    pub amount: Coins,
    pub auth: Vec<Address>,
    #[serde(with = "hex_bytes")]
    pub data: Vec<u8>,
    pub from: AccountId,
    pub router: String,
    pub to: AccountId,
}

impl Msg {
    pub fn new(router: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            router: router.into(),
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn with_auth(mut self, auth: Address) -> Self {
        self.auth.push(auth);
        self
    }

    pub fn with_transfer(mut self, from: AccountId, to: AccountId, amount: Coins) -> Self {
        self.from = from;
        self.to = to;
        self.amount = amount;
        self
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    /// Action name; an empty action is a plain transfer.
    pub fn msg_type(&self) -> &str {
        if self.action.is_empty() {
            "transfer"
        } else {
            &self.action
        }
    }

    /// `from` when it is an address, then every other auth address.
    pub fn signers(&self) -> Vec<Address> {
        let from = self.from.address();
        let mut out = Vec::with_capacity(MSG_MAX_AUTH + 1);
        out.extend(from);
        out.extend(
            self.auth
                .iter()
                .filter(|a| !a.is_empty() && Some(**a) != from)
                .copied(),
        );
        out
    }

    pub fn validate_basic(&self) -> Result<(), AnteError> {
        if self.router.is_empty() {
            return Err(AnteError::InvalidRequest("msg missing router".into()));
        }
        if !self.data.is_empty() && self.action.is_empty() {
            return Err(AnteError::InvalidRequest("msg missing action".into()));
        }
        if self.signers().is_empty() {
            return Err(AnteError::InvalidRequest("msg missing auth".into()));
        }
        if self.auth.len() > MSG_MAX_AUTH {
            return Err(AnteError::InvalidRequest(format!(
                "msg has {} auths, max {}",
                self.auth.len(),
                MSG_MAX_AUTH
            )));
        }
        if self.data.len() > MSG_MAX_DATA_LEN {
            return Err(AnteError::InvalidRequest(format!(
                "msg data too large: {} bytes",
                self.data.len()
            )));
        }
        self.amount
            .validate()
            .map_err(|e| AnteError::InvalidRequest(e.to_string()))
    }

    /// A transfer performed by the message payload must be the one the
    /// envelope declares.
    pub fn validate_transfer_to(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: &Coins,
    ) -> Result<(), AnteError> {
        if amount.is_zero() || (self.from == *from && self.to == *to && self.amount == *amount) {
            return Ok(());
        }
        Err(AnteError::InvalidRequest(format!(
            "transfer {} -> {} {} does not match msg {} -> {} {}",
            from, to, amount, self.from, self.to, self.amount
        )))
    }
}

// =============================================================================
// FEE AND TX
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Coins,
    pub gas: u64,
    /// Empty means the first signer pays.
    pub payer: AccountId,
}

impl StdFee {
    pub fn new(amount: Coins, gas: u64) -> Self {
        Self {
            amount,
            gas,
            payer: AccountId::Empty,
        }
    }

    pub fn with_payer(mut self, payer: AccountId) -> Self {
        self.payer = payer;
        self
    }
}

/// The standard transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdTx {
    pub msgs: Vec<Msg>,
    pub fee: StdFee,
    pub signatures: Vec<StdSignature>,
    pub memo: String,
}

/// Canonical document a signer signs.
#[derive(Debug, Serialize)]
pub struct StdSignDoc<'a> {
    pub account_number: u64,
    pub chain_id: &'a str,
    pub fee: &'a StdFee,
    pub memo: &'a str,
    pub msgs: &'a [Msg],
    pub sequence: u64,
}

/// JSON sign bytes over `(chain_id, account_number, sequence, fee, msgs, memo)`.
pub fn std_sign_bytes(
    chain_id: &str,
    account_number: u64,
    sequence: u64,
    fee: &StdFee,
    msgs: &[Msg],
    memo: &str,
) -> Result<Vec<u8>, AnteError> {
    let doc = StdSignDoc {
        account_number,
        chain_id,
        fee,
        memo,
        msgs,
        sequence,
    };
    serde_json::to_vec(&doc).map_err(|e| AnteError::TxDecode(format!("sign doc: {}", e)))
}

impl StdTx {
    pub fn new(msgs: Vec<Msg>, fee: StdFee, signatures: Vec<StdSignature>, memo: impl Into<String>) -> Self {
        Self {
            msgs,
            fee,
            signatures,
            memo: memo.into(),
        }
    }

    /// Signers of all messages, first appearance order, deduplicated.
    pub fn signers(&self) -> Vec<Address> {
        let mut out: Vec<Address> = Vec::new();
        for addr in self.msgs.iter().flat_map(Msg::signers) {
            if !out.contains(&addr) {
                out.push(addr);
            }
        }
        out
    }

    pub fn fee_payer(&self) -> AccountId {
        if !self.fee.payer.is_empty() {
            return self.fee.payer;
        }
        self.signers()
            .first()
            .map(|a| AccountId::from(*a))
            .unwrap_or_default()
    }

    pub fn sign_bytes(&self, chain_id: &str, account_number: u64, sequence: u64) -> Result<Vec<u8>, AnteError> {
        std_sign_bytes(chain_id, account_number, sequence, &self.fee, &self.msgs, &self.memo)
    }

    pub fn encode(&self) -> Result<Vec<u8>, AnteError> {
        bincode::serialize(self).map_err(|e| AnteError::TxDecode(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, AnteError> {
        bincode::deserialize(bytes).map_err(|e| AnteError::TxDecode(e.to_string()))
    }
}

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Any transaction the ante chain can run.
pub trait Tx: Send + Sync {
    fn msgs(&self) -> &[Msg];

    /// Stateless checks.
    fn validate_basic(&self, config: &AnteConfig) -> Result<(), AnteError>;

    fn as_fee_tx(&self) -> Option<&dyn FeeTx> {
        None
    }

    fn as_sig_verifiable(&self) -> Option<&dyn SigVerifiableTx> {
        None
    }
}

/// Gas limit, fee and payer.
pub trait FeeTx {
    fn gas(&self) -> u64;
    fn fee(&self) -> &Coins;
    fn fee_payer(&self) -> AccountId;
}

/// Signatures and the addresses that must have produced them.
pub trait SigVerifiableTx {
    fn signatures(&self) -> &[StdSignature];
    fn signers(&self) -> Vec<Address>;
    fn sign_bytes(&self, chain_id: &str, account_number: u64, sequence: u64) -> Result<Vec<u8>, AnteError>;
}

impl Tx for StdTx {
    fn msgs(&self) -> &[Msg] {
        &self.msgs
    }

    fn validate_basic(&self, config: &AnteConfig) -> Result<(), AnteError> {
        if self.msgs.is_empty() {
            return Err(AnteError::InvalidRequest("must contain at least one message".into()));
        }
        for msg in &self.msgs {
            msg.validate_basic()?;
        }

        let memo_len = self.memo.chars().count();
        if memo_len > config.max_memo_characters {
            return Err(AnteError::MemoTooLarge {
                len: memo_len,
                max: config.max_memo_characters,
            });
        }

        if self.fee.gas > i64::MAX as u64 {
            return Err(AnteError::InvalidRequest(format!("invalid gas supplied; {} > max", self.fee.gas)));
        }
        self.fee
            .amount
            .validate()
            .map_err(|e| AnteError::InsufficientFee(format!("invalid fee amount: {}", e)))?;

        if self.signatures.is_empty() {
            return Err(AnteError::NoSignatures);
        }
        if self.signatures.len() > config.tx_sig_limit {
            return Err(AnteError::TooManySignatures {
                got: self.signatures.len(),
                limit: config.tx_sig_limit,
            });
        }
        let signers = self.signers().len();
        if self.signatures.len() != signers {
            return Err(AnteError::Unauthorized(format!(
                "wrong number of signers; expected {}, got {}",
                signers,
                self.signatures.len()
            )));
        }
        Ok(())
    }

    fn as_fee_tx(&self) -> Option<&dyn FeeTx> {
        Some(self)
    }

    fn as_sig_verifiable(&self) -> Option<&dyn SigVerifiableTx> {
        Some(self)
    }
}

impl FeeTx for StdTx {
    fn gas(&self) -> u64 {
        self.fee.gas
    }

    fn fee(&self) -> &Coins {
        &self.fee.amount
    }

    fn fee_payer(&self) -> AccountId {
        StdTx::fee_payer(self)
    }
}

impl SigVerifiableTx for StdTx {
    fn signatures(&self) -> &[StdSignature] {
        &self.signatures
    }

    fn signers(&self) -> Vec<Address> {
        StdTx::signers(self)
    }

    fn sign_bytes(&self, chain_id: &str, account_number: u64, sequence: u64) -> Result<Vec<u8>, AnteError> {
        StdTx::sign_bytes(self, chain_id, account_number, sequence)
    }
}
