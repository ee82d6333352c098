//! Ledger configuration.

use shared_types::{AccountId, Name};

/// Static parameters of the asset keeper, constructed once per chain.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Bonding denom; exempt from the supply cap.
    pub native_denom: String,
    /// Account receiving fees as coin power.
    pub fee_collector: AccountId,
    /// Maximum coin description length in bytes.
    pub max_description_len: usize,
    /// Blocks after creation during which a non-issuable coin may still be issued.
    pub issue_wait_blocks: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            native_denom: "kratos/kts".to_string(),
            fee_collector: Name::new("fee@kts")
                .map(AccountId::from)
                .unwrap_or_default(),
            max_description_len: 256,
            issue_wait_blocks: 1000,
        }
    }
}
