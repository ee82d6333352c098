//! # Asset Message Handler
//!
//! Applies message-level policy on top of the keeper and emits events.
//!
//! ## Authorization
//!
//! The transaction's verified signer addresses are passed in. An account
//! id is authorized when it is one of those addresses, or a name whose
//! registered auth address is one of them.
//!
//! | Message | Authorizes | Extra rule |
//! |---------|-----------|------------|
//! | `Create` | creator | supply denoms must be `creator/symbol` |
//! | `Issue` | creator | non-issuable coins close after `issue_wait_blocks` |
//! | `Burn` | id | coin must be burnable |
//! | `Lock` | id | every coin must be lockable |
//! | `Approve` | id | locked approvals are frozen |
//! | `TransferFromApprove` | spender | allowance must cover the amount |

mod msgs;

pub use msgs::{AssetMsg, ROUTER_KEY};

use crate::domain::{coin_accounts_from_denom, AssetError, CoinOptions};
use crate::events::*;
use crate::ports::{AccountEnsurer, AuthLookup, KvStore};
use crate::service::AssetKeeper;
use quantum_telemetry::{metric_inc, LEDGER_COINS_CREATED, LEDGER_OPERATIONS};
use shared_types::{coin_denom, AccountId, Address, BlockContext};
use tracing::debug;

/// Routes [`AssetMsg`]s to an [`AssetKeeper`].
pub struct AssetHandler<S: KvStore, A: AccountEnsurer, L: AuthLookup> {
    keeper: AssetKeeper<S, A>,
    auth: L,
}

impl<S: KvStore, A: AccountEnsurer, L: AuthLookup> AssetHandler<S, A, L> {
    pub fn new(keeper: AssetKeeper<S, A>, auth: L) -> Self {
        Self { keeper, auth }
    }

    pub fn keeper(&self) -> &AssetKeeper<S, A> {
        &self.keeper
    }

    /// Handle one message signed by `signers`.
    pub fn handle(
        &self,
        ctx: &BlockContext,
        signers: &[Address],
        msg: &AssetMsg,
    ) -> Result<Vec<Event>, AssetError> {
        let action = msg.action();
        let result = self.dispatch(ctx, signers, msg);

        let outcome = if result.is_ok() { "ok" } else { "error" };
        metric_inc!(LEDGER_OPERATIONS, &[action, outcome]);

        if let Err(err) = &result {
            debug!(module = "asset", height = ctx.height, action, error = %err, "message rejected");
        }
        result
    }

    fn dispatch(
        &self,
        ctx: &BlockContext,
        signers: &[Address],
        msg: &AssetMsg,
    ) -> Result<Vec<Event>, AssetError> {
        msg.validate_basic()?;

        // zero transfers never reach the keeper, whatever the accounts
        if let AssetMsg::Transfer { amount, .. } = msg {
            if amount.is_zero() {
                return Ok(Vec::new());
            }
        }

        for id in msg.required_auths() {
            self.require_auth(&id, signers)?;
        }

        match msg {
            AssetMsg::Transfer { from, to, amount } => {
                self.keeper
                    .transfer(ctx, from, to, amount)
                    .map_err(|e| e.wrap("msg transfer"))?;
                Ok(vec![Event::new(EVENT_TYPE_TRANSFER)
                    .attr(ATTRIBUTE_KEY_FROM, from)
                    .attr(ATTRIBUTE_KEY_TO, to)
                    .attr(ATTRIBUTE_KEY_AMOUNT, amount)])
            }

            AssetMsg::Create {
                creator,
                symbol,
                max_supply,
                can_issue,
                can_lock,
                can_burn,
                issue_to_height,
                init_supply,
                desc,
            } => {
                debug!(
                    module = "asset",
                    %creator,
                    %symbol,
                    %max_supply,
                    can_issue,
                    can_lock,
                    can_burn,
                    issue_to_height,
                    %init_supply,
                    "handle coin create"
                );

                let denom = coin_denom(&creator.to_string(), &symbol.to_string());
                if init_supply.denom != denom || max_supply.denom != denom {
                    return Err(AssetError::SymbolError(
                        "coin denom should be equal".to_string(),
                    ));
                }

                let opts = CoinOptions {
                    can_issue: *can_issue,
                    can_lock: *can_lock,
                    can_burn: *can_burn,
                    issue_to_height: *issue_to_height,
                    init_supply: init_supply.clone(),
                };
                self.keeper
                    .create(ctx, creator, symbol, max_supply.clone(), &opts, desc)
                    .map_err(|e| e.wrap(format!("msg create coin {}", symbol)))?;
                metric_inc!(LEDGER_COINS_CREATED);

                Ok(vec![Event::new(EVENT_TYPE_CREATE)
                    .attr(ATTRIBUTE_KEY_CREATOR, creator)
                    .attr(ATTRIBUTE_KEY_SYMBOL, symbol)
                    .attr(ATTRIBUTE_KEY_MAX_SUPPLY, max_supply)
                    .attr(ATTRIBUTE_KEY_CAN_ISSUE, can_issue)
                    .attr(ATTRIBUTE_KEY_CAN_LOCK, can_lock)
                    .attr(ATTRIBUTE_KEY_ISSUE_TO_HEIGHT, issue_to_height)
                    .attr(ATTRIBUTE_KEY_INIT, init_supply)
                    .attr(ATTRIBUTE_KEY_DESCRIPTION, String::from_utf8_lossy(desc))])
            }

            AssetMsg::Issue {
                creator,
                symbol,
                amount,
            } => {
                if amount.denom != coin_denom(&creator.to_string(), &symbol.to_string()) {
                    return Err(AssetError::SymbolError("coin denom not match".to_string()));
                }

                let stat = self
                    .keeper
                    .get_coin_stat(creator, symbol)
                    .map_err(|e| e.wrap(format!("get coin stat from coin {}", amount)))?;

                if !stat.can_issue
                    && ctx.height > stat.create_height + self.keeper.config().issue_wait_blocks
                {
                    return Err(AssetError::CoinCannotBeIssue(format!(
                        "{} cannot be issued {} blocks after creation",
                        amount,
                        self.keeper.config().issue_wait_blocks
                    )));
                }

                self.keeper
                    .issue(ctx, creator, symbol, amount.clone())
                    .map_err(|e| e.wrap(format!("msg issue coin {}", symbol)))?;

                Ok(vec![Event::new(EVENT_TYPE_ISSUE)
                    .attr(ATTRIBUTE_KEY_CREATOR, creator)
                    .attr(ATTRIBUTE_KEY_SYMBOL, symbol)
                    .attr(ATTRIBUTE_KEY_AMOUNT, amount)])
            }

            AssetMsg::Burn { id, amount } => {
                let (creator, symbol) = coin_accounts_from_denom(&amount.denom)?;
                let stat = self
                    .keeper
                    .get_coin_stat(&creator, &symbol)
                    .map_err(|e| e.wrap(format!("get coin stat from coin {}", amount)))?;
                if !stat.can_burn {
                    return Err(AssetError::CoinCannotBeBurn(amount.to_string()));
                }

                self.keeper
                    .burn(ctx, id, amount.clone())
                    .map_err(|e| e.wrap(format!("msg burn coin {}", id)))?;

                Ok(vec![Event::new(EVENT_TYPE_BURN)
                    .attr(ATTRIBUTE_KEY_FROM, id)
                    .attr(ATTRIBUTE_KEY_AMOUNT, amount)])
            }

            AssetMsg::Lock {
                id,
                amount,
                unlock_block_height,
            } => {
                for coin in amount {
                    let (creator, symbol) = coin_accounts_from_denom(&coin.denom)?;
                    let stat = self
                        .keeper
                        .get_coin_stat(&creator, &symbol)
                        .map_err(|e| e.wrap(format!("get coin stat from coin {}", amount)))?;
                    if !stat.can_lock {
                        return Err(AssetError::CoinCannotBeLock(coin.to_string()));
                    }
                }

                self.keeper
                    .lock_coins(ctx, id, *unlock_block_height, amount)
                    .map_err(|e| e.wrap(format!("msg lock coin {}", id)))?;

                Ok(vec![Event::new(EVENT_TYPE_LOCK)
                    .attr(ATTRIBUTE_KEY_FROM, id)
                    .attr(ATTRIBUTE_KEY_AMOUNT, amount)
                    .attr(ATTRIBUTE_KEY_UNLOCK_HEIGHT, unlock_block_height)])
            }

            AssetMsg::Unlock { id, amount } => {
                self.keeper
                    .unlock_coins(ctx, id, amount)
                    .map_err(|e| e.wrap(format!("msg unlock coin {}", id)))?;
                Ok(vec![Event::new(EVENT_TYPE_UNLOCK)
                    .attr(ATTRIBUTE_KEY_FROM, id)
                    .attr(ATTRIBUTE_KEY_AMOUNT, amount)])
            }

            AssetMsg::UnlockFreezed { id, amount } => {
                self.keeper
                    .unlock_freezed_coins(ctx, id, amount)
                    .map_err(|e| e.wrap(format!("msg unlock freezed coin {}", id)))?;
                Ok(vec![Event::new(EVENT_TYPE_UNLOCK)
                    .attr(ATTRIBUTE_KEY_FROM, id)
                    .attr(ATTRIBUTE_KEY_AMOUNT, amount)])
            }

            AssetMsg::Exercise { id, amount } => {
                self.keeper
                    .exercise_coin_power(ctx, id, amount)
                    .map_err(|e| e.wrap(format!("msg exercise coin {}", id)))?;
                Ok(vec![Event::new(EVENT_TYPE_EXERCISE)
                    .attr(ATTRIBUTE_KEY_FROM, id)
                    .attr(ATTRIBUTE_KEY_AMOUNT, amount)])
            }

            AssetMsg::Approve {
                id,
                spender,
                amount,
                is_lock,
            } => {
                if let Some(existing) = self.keeper.get_approve_coins(id, spender)? {
                    if existing.is_lock {
                        return Err(AssetError::ApproveCannotChangeLock);
                    }
                }

                self.keeper
                    .approve(ctx, id, spender, amount, *is_lock)
                    .map_err(|e| e.wrap("msg approve handler error"))?;

                Ok(vec![Event::new(EVENT_TYPE_APPROVE)
                    .attr(ATTRIBUTE_KEY_FROM, id)
                    .attr(ATTRIBUTE_KEY_SPENDER, spender)
                    .attr(ATTRIBUTE_KEY_AMOUNT, amount)])
            }

            AssetMsg::TransferFromApprove {
                owner,
                spender,
                to,
                amount,
            } => {
                self.keeper
                    .transfer_from_approve(ctx, owner, spender, to, amount)
                    .map_err(|e| e.wrap("msg transfer from approve"))?;
                Ok(vec![Event::new(EVENT_TYPE_TRANSFER)
                    .attr(ATTRIBUTE_KEY_FROM, owner)
                    .attr(ATTRIBUTE_KEY_SPENDER, spender)
                    .attr(ATTRIBUTE_KEY_TO, to)
                    .attr(ATTRIBUTE_KEY_AMOUNT, amount)])
            }
        }
    }

    fn require_auth(&self, id: &AccountId, signers: &[Address]) -> Result<(), AssetError> {
        let authorized = match id {
            AccountId::Address(addr) => signers.contains(addr),
            AccountId::Name(name) => self
                .auth
                .get_auth(name)
                .map(|auth| signers.contains(&auth))
                .unwrap_or(false),
            AccountId::Empty => false,
        };

        if authorized {
            Ok(())
        } else {
            Err(AssetError::Unauthorized(format!("{} has not signed", id)))
        }
    }
}
