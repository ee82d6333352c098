//! Deterministic value codec for store entries.
//!
//! `bincode` with its default (fixed-int, little-endian) options: the same
//! value always encodes to the same bytes on every node.

use crate::domain::AssetError;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, AssetError> {
    bincode::serialize(value).map_err(|e| AssetError::Codec(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AssetError> {
    bincode::deserialize(bytes).map_err(|e| AssetError::Codec(e.to_string()))
}
