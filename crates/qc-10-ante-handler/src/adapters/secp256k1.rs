//! # secp256k1 Signatures
//!
//! ECDSA over SHA-256 with compressed public keys. Addresses are the last
//! 20 bytes of keccak256 over the uncompressed point (without the `0x04`
//! tag), as on Ethereum.
//!
//! High-S signatures are rejected by `k256` during verification.

use crate::domain::errors::AnteError;
use crate::domain::tx::PubKey;
use crate::ports::outbound::SignatureVerifier;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use sha2::Sha256;
use sha3::{Digest, Keccak256};
use shared_types::Address;

/// Keccak-256 hash of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&Keccak256::digest(data));
    hash
}

/// Derive the account address of a verifying key.
pub fn address_from_verifying_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address(address)
}

fn parse_pub_key(pub_key: &PubKey) -> Result<VerifyingKey, AnteError> {
    VerifyingKey::from_sec1_bytes(pub_key.as_bytes())
        .map_err(|_| AnteError::InvalidPubKey(format!("not a secp256k1 key: {:?}", pub_key)))
}

/// The shipped [`SignatureVerifier`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Verifier;

impl Secp256k1Verifier {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureVerifier for Secp256k1Verifier {
    fn address(&self, pub_key: &PubKey) -> Result<Address, AnteError> {
        parse_pub_key(pub_key).map(|key| address_from_verifying_key(&key))
    }

    fn verify(&self, pub_key: &PubKey, msg: &[u8], signature: &[u8]) -> bool {
        let Ok(key) = parse_pub_key(pub_key) else {
            return false;
        };
        let Ok(sig) = Signature::from_slice(signature) else {
            return false;
        };
        let digest = Sha256::digest(msg);
        key.verify_prehash(&digest, &sig).is_ok()
    }
}

/// Client-side signing key.
pub struct Secp256k1Signer {
    key: SigningKey,
}

impl Secp256k1Signer {
    pub fn from_bytes(secret: &[u8; 32]) -> Result<Self, AnteError> {
        SigningKey::from_slice(secret)
            .map(|key| Self { key })
            .map_err(|_| AnteError::InvalidPubKey("invalid secp256k1 secret".into()))
    }

    pub fn pub_key(&self) -> PubKey {
        let point = self.key.verifying_key().to_encoded_point(true);
        PubKey(point.as_bytes().to_vec())
    }

    pub fn address(&self) -> Address {
        address_from_verifying_key(self.key.verifying_key())
    }

    /// Compact `r || s` signature over SHA-256 of `msg`.
    pub fn sign(&self, msg: &[u8]) -> Result<Vec<u8>, AnteError> {
        let digest = Sha256::digest(msg);
        let sig: Signature = self
            .key
            .sign_prehash(&digest)
            .map_err(|e| AnteError::InvalidRequest(format!("signing failed: {}", e)))?;
        Ok(sig.to_bytes().to_vec())
    }
}
