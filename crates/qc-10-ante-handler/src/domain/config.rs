//! Ante chain parameters.

use super::errors::AnteError;
use shared_types::{Dec, DecCoin, DecCoins};
use std::env;

pub const DEFAULT_GAS_TX_SIZE_PRICE: u64 = 10;
pub const DEFAULT_MAX_MEMO_CHARACTERS: usize = 256;
pub const DEFAULT_TX_SIG_LIMIT: usize = 7;

/// Static parameters of the ante chain, constructed once per node.
#[derive(Debug, Clone)]
pub struct AnteConfig {
    /// Chain id bound into every sign doc.
    pub chain_id: String,
    /// Node-local minimum gas prices; empty disables the mempool fee check.
    pub min_gas_prices: DecCoins,
    /// Gas charged per transaction byte.
    pub gas_tx_size_price: u64,
    pub max_memo_characters: usize,
    pub tx_sig_limit: usize,
}

impl Default for AnteConfig {
    fn default() -> Self {
        Self {
            chain_id: "testing".to_string(),
            min_gas_prices: DecCoins::default(),
            gas_tx_size_price: DEFAULT_GAS_TX_SIZE_PRICE,
            max_memo_characters: DEFAULT_MAX_MEMO_CHARACTERS,
            tx_sig_limit: DEFAULT_TX_SIG_LIMIT,
        }
    }
}

impl AnteConfig {
    /// Defaults overridden from the environment.
    ///
    /// - `QC_CHAIN_ID`: chain id (default: testing)
    /// - `QC_MIN_GAS_PRICES`: comma separated prices, e.g. `0.002kratos/kts`
    pub fn from_env() -> Result<Self, AnteError> {
        let mut config = Self::default();
        if let Ok(chain_id) = env::var("QC_CHAIN_ID") {
            config.chain_id = chain_id;
        }
        if let Ok(prices) = env::var("QC_MIN_GAS_PRICES") {
            config.min_gas_prices = parse_gas_prices(&prices)?;
        }
        Ok(config)
    }
}

/// Parse `"<dec><denom>,..."` into gas prices.
pub fn parse_gas_prices(s: &str) -> Result<DecCoins, AnteError> {
    let mut prices = Vec::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let split = part
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| AnteError::InvalidRequest(format!("gas price without denom: {}", part)))?;
        let (amount, denom) = part.split_at(split);
        let amount: Dec = amount
            .parse()
            .map_err(|e| AnteError::InvalidRequest(format!("gas price {}: {}", part, e)))?;
        prices.push(DecCoin::new(denom, amount));
    }
    let prices = DecCoins::new(prices);
    prices
        .validate()
        .map_err(|e| AnteError::InvalidRequest(e.to_string()))?;
    Ok(prices)
}
