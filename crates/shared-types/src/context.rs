//! Block-level context shared by the ledger and the ante chain.

use serde::{Deserialize, Serialize};

/// Chain identity and height of the block being executed.
///
/// Height 0 is genesis.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    pub chain_id: String,
    pub height: i64,
}

impl BlockContext {
    pub fn new(chain_id: impl Into<String>, height: i64) -> Self {
        Self {
            chain_id: chain_id.into(),
            height,
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }

    /// Same chain, different height.
    pub fn at_height(&self, height: i64) -> Self {
        Self {
            chain_id: self.chain_id.clone(),
            height,
        }
    }
}
