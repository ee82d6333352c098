//! Fee payment through the coin ledger.

use crate::domain::errors::AnteError;
use crate::ports::outbound::FeeKeeper;
use qc_04_asset_ledger::{AccountEnsurer, AssetError, AssetKeeper, KvStore};
use shared_types::{AccountId, BlockContext, Coins};

/// [`FeeKeeper`] over an [`AssetKeeper`].
pub struct LedgerFeeKeeper<S: KvStore, A: AccountEnsurer> {
    keeper: AssetKeeper<S, A>,
}

impl<S: KvStore, A: AccountEnsurer> LedgerFeeKeeper<S, A> {
    pub fn new(keeper: AssetKeeper<S, A>) -> Self {
        Self { keeper }
    }

    pub fn keeper(&self) -> &AssetKeeper<S, A> {
        &self.keeper
    }
}

impl<S: KvStore, A: AccountEnsurer> FeeKeeper for LedgerFeeKeeper<S, A> {
    fn pay_fee(&self, ctx: &BlockContext, payer: &AccountId, fee: &Coins) -> Result<(), AnteError> {
        self.keeper
            .pay_fee(ctx, payer, fee)
            .map_err(|e| match e.root() {
                AssetError::CoinNoEnough(_) | AssetError::CoinsLocked(_) => {
                    AnteError::InsufficientFunds(format!("{} cannot pay {}: {}", payer, fee, e))
                }
                _ => AnteError::Ledger(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryAccountKeeper;
    use qc_04_asset_ledger::{CoinOptions, LedgerConfig, MemoryStore};
    use shared_types::{Address, Coin, ErrorCode, Name};
    use std::sync::Arc;

    const DENOM: &str = "kratos/kts";

    fn setup() -> (LedgerFeeKeeper<Arc<MemoryStore>, Arc<InMemoryAccountKeeper>>, AccountId) {
        setup_with(LedgerConfig::default())
    }

    fn setup_with(config: LedgerConfig) -> (LedgerFeeKeeper<Arc<MemoryStore>, Arc<InMemoryAccountKeeper>>, AccountId) {
        let accounts = Arc::new(InMemoryAccountKeeper::new());
        let kratos = Name::new("kratos").unwrap();
        accounts.add_name_account(kratos, Address([1; 20])).unwrap();
        accounts.add_name_account(Name::new("fee@kts").unwrap(), Address([2; 20])).unwrap();
        accounts.add_name_account(Name::new("treasury").unwrap(), Address([3; 20])).unwrap();

        let keeper = AssetKeeper::new(Arc::new(MemoryStore::new()), accounts, config);
        let ctx = BlockContext::new("testing", 1);
        keeper
            .create(&ctx, &kratos, &Name::new("kts").unwrap(), Coin::new(DENOM, 1_000_000), &CoinOptions::unrestricted(DENOM), b"")
            .unwrap();
        keeper
            .issue(&ctx, &kratos, &Name::new("kts").unwrap(), Coin::new(DENOM, 100))
            .unwrap();
        (LedgerFeeKeeper::new(keeper), AccountId::from(kratos))
    }

    #[test]
    fn test_fee_moves_to_collector_power() {
        let (fees, payer) = setup();
        let collector = fees.keeper().config().fee_collector;
        let ctx = BlockContext::new("testing", 2);
        fees.pay_fee(&ctx, &payer, &Coins::from_coin(Coin::new(DENOM, 40))).unwrap();

        assert_eq!(fees.keeper().get_coins(&payer).unwrap().amount_of(DENOM), 60);
        assert_eq!(fees.keeper().get_coin_powers(&collector).unwrap().amount_of(DENOM), 40);
    }

    #[test]
    fn test_fee_follows_ledger_collector() {
        let treasury = AccountId::from(Name::new("treasury").unwrap());
        let (fees, payer) = setup_with(LedgerConfig {
            fee_collector: treasury,
            ..LedgerConfig::default()
        });
        let ctx = BlockContext::new("testing", 2);
        fees.pay_fee(&ctx, &payer, &Coins::from_coin(Coin::new(DENOM, 25))).unwrap();

        assert_eq!(fees.keeper().get_coin_powers(&treasury).unwrap().amount_of(DENOM), 25);
        let default_collector = AccountId::from(Name::new("fee@kts").unwrap());
        assert!(fees.keeper().get_coin_powers(&default_collector).unwrap().is_zero());
    }

    #[test]
    fn test_short_balance_is_insufficient_funds() {
        let (fees, payer) = setup();
        let ctx = BlockContext::new("testing", 2);
        let err = fees
            .pay_fee(&ctx, &payer, &Coins::from_coin(Coin::new(DENOM, 101)))
            .unwrap_err();
        assert_eq!((err.codespace(), err.code()), ("sdk", 5));

        let err = fees
            .pay_fee(&ctx, &AccountId::Empty, &Coins::from_coin(Coin::new(DENOM, 1)))
            .unwrap_err();
        assert_eq!((err.codespace(), err.code()), ("asset", 8));
    }
}
