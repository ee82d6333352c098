//! # Asset Flows
//!
//! Coin lifecycle driven entirely by signed transactions: creation under a
//! name account, issuance against the vesting cap, locks, allowances and
//! coin power.

#[cfg(test)]
mod tests {
    use crate::app::*;
    use qc_04_asset_ledger::AssetMsg;
    use qc_10_ante_handler::{AnteError, Msg, Secp256k1Signer, StdFee};
    use shared_types::{AccountId, Address, Coin, Coins, ErrorCode, Name};

    const GOLD: &str = "alice/gold";

    fn free() -> StdFee {
        StdFee::new(Coins::empty(), 200_000)
    }

    fn gold(amount: u128) -> Coins {
        Coins::from_coin(Coin::new(GOLD, amount))
    }

    fn gold_of(app: &TestApp, id: &AccountId) -> u128 {
        app.keeper().get_coins(id).unwrap().amount_of(GOLD)
    }

    struct Alice {
        key: Secp256k1Signer,
        id: AccountId,
    }

    /// App with the name account `alice` registered.
    fn app_with_alice() -> (TestApp, Alice) {
        let app = TestApp::new();
        let key = signer(1);
        app.accounts.add_name_account(name("alice"), key.address()).unwrap();
        let id = AccountId::from(name("alice"));
        (app, Alice { key, id })
    }

    fn send(app: &TestApp, key: &Secp256k1Signer, msg: AssetMsg) -> Result<(), AnteError> {
        send_as(app, key, msg, &[key.address()])
    }

    fn send_as(
        app: &TestApp,
        key: &Secp256k1Signer,
        msg: AssetMsg,
        auth: &[Address],
    ) -> Result<(), AnteError> {
        let envelope: Msg = asset_msg(&msg, auth)?;
        let raw = app.sign_raw(vec![envelope], free(), &[key])?;
        app.deliver_tx(&raw).map(|_| ())
    }

    fn create_gold(app: &TestApp, alice: &Alice, max: u128, issue_to_height: i64) -> Result<(), AnteError> {
        send(
            app,
            &alice.key,
            AssetMsg::Create {
                creator: name("alice"),
                symbol: name("gold"),
                max_supply: Coin::new(GOLD, max),
                can_issue: true,
                can_lock: true,
                can_burn: true,
                issue_to_height,
                init_supply: Coin::new(GOLD, 0),
                desc: b"gold".to_vec(),
            },
        )
    }

    fn issue(app: &TestApp, alice: &Alice, amount: u128) -> Result<(), AnteError> {
        send(
            app,
            &alice.key,
            AssetMsg::Issue {
                creator: name("alice"),
                symbol: name("gold"),
                amount: Coin::new(GOLD, amount),
            },
        )
    }

    fn code(err: &AnteError) -> (&'static str, u32) {
        (err.codespace(), err.code())
    }

    // =========================================================================
    // CREATE / ISSUE
    // =========================================================================

    #[test]
    fn test_create_issue_transfer() {
        let (app, alice) = app_with_alice();
        let bob = AccountId::from(signer(2).address());

        create_gold(&app, &alice, 10_000, 0).unwrap();
        issue(&app, &alice, 1_000).unwrap();
        send(
            &app,
            &alice.key,
            AssetMsg::Transfer {
                from: alice.id,
                to: bob,
                amount: gold(300),
            },
        )
        .unwrap();

        assert_eq!(gold_of(&app, &alice.id), 700);
        assert_eq!(gold_of(&app, &bob), 300);
        let desc = app
            .keeper()
            .get_coin_desc(&name("alice"), &name("gold"))
            .unwrap()
            .expect("description stored at create");
        assert_eq!(desc.description, b"gold".to_vec());

        // created once
        let err = create_gold(&app, &alice, 10_000, 0).unwrap_err();
        assert_eq!(code(&err), ("asset", 1));
    }

    #[test]
    fn test_issue_follows_vesting_cap() {
        let (mut app, alice) = app_with_alice();
        app.set_height(100);
        create_gold(&app, &alice, 10_000, 200).unwrap();

        // limit at 150 is 0 + 10000 * 50 / 100
        app.set_height(150);
        issue(&app, &alice, 4_990).unwrap();
        let err = issue(&app, &alice, 20).unwrap_err();
        assert_eq!(code(&err), ("asset", 4));

        issue(&app, &alice, 10).unwrap();
        let supply = app
            .keeper()
            .get_coin_total_supply(&name("alice"), &name("gold"))
            .unwrap();
        assert_eq!(supply.amount, 5_000);
    }

    #[test]
    fn test_creator_must_sign() {
        let (app, alice) = app_with_alice();
        create_gold(&app, &alice, 10_000, 0).unwrap();

        // mallory signs for alice's coin
        let mallory = signer(9);
        let err = send_as(
            &app,
            &mallory,
            AssetMsg::Issue {
                creator: name("alice"),
                symbol: name("gold"),
                amount: Coin::new(GOLD, 1),
            },
            &[mallory.address()],
        )
        .unwrap_err();
        assert_eq!(code(&err), ("asset", 27));
    }

    // =========================================================================
    // LOCKS
    // =========================================================================

    #[test]
    fn test_locked_coins_are_not_usable() {
        let (mut app, alice) = app_with_alice();
        let bob = AccountId::from(signer(2).address());
        create_gold(&app, &alice, 10_000_000, 0).unwrap();
        issue(&app, &alice, 1_000_000).unwrap();

        let unlock_at = app.height() + 5;
        send(
            &app,
            &alice.key,
            AssetMsg::Lock {
                id: alice.id,
                amount: gold(100),
                unlock_block_height: unlock_at,
            },
        )
        .unwrap();

        let spend = |app: &TestApp, amount| {
            send(
                app,
                &alice.key,
                AssetMsg::Transfer {
                    from: alice.id,
                    to: bob,
                    amount: gold(amount),
                },
            )
        };

        let err = spend(&app, 999_901).unwrap_err();
        assert_eq!(code(&err), ("asset", 13));
        spend(&app, 999_900).unwrap();
        assert_eq!(gold_of(&app, &bob), 999_900);

        // still locked before maturity
        let unlock = |app: &TestApp| {
            send(
                app,
                &alice.key,
                AssetMsg::Unlock {
                    id: alice.id,
                    amount: gold(100),
                },
            )
        };
        assert!(unlock(&app).is_err());

        app.set_height(unlock_at);
        unlock(&app).unwrap();
        let (locked, buckets) = app.keeper().get_lock_coins(&alice.id).unwrap();
        assert!(locked.is_zero());
        assert!(buckets.is_empty());
        spend(&app, 100).unwrap();
        assert_eq!(gold_of(&app, &alice.id), 0);
    }

    // =========================================================================
    // ALLOWANCES
    // =========================================================================

    #[test]
    fn test_approve_then_transfer_from() {
        let app = TestApp::new();
        let (owner_key, spender_key) = (signer(1), signer(2));
        let owner = AccountId::from(owner_key.address());
        let spender = AccountId::from(spender_key.address());
        let carol = AccountId::from(signer(3).address());
        app.fund(&owner, 1_000).unwrap();

        send(
            &app,
            &owner_key,
            AssetMsg::Approve {
                id: owner,
                spender,
                amount: core_coins(300),
                is_lock: false,
            },
        )
        .unwrap();

        // the allowance is reserved from the owner's own spending
        let err = send(
            &app,
            &owner_key,
            AssetMsg::Transfer {
                from: owner,
                to: carol,
                amount: core_coins(800),
            },
        )
        .unwrap_err();
        assert_eq!(code(&err), ("asset", 13));

        let pull = |amount| {
            send(
                &app,
                &spender_key,
                AssetMsg::TransferFromApprove {
                    owner,
                    spender,
                    to: carol,
                    amount: core_coins(amount),
                },
            )
        };
        pull(200).unwrap();
        assert_eq!(app.keeper().get_coins(&carol).unwrap(), core_coins(200));
        assert_eq!(app.keeper().get_approve_sum(&owner).unwrap(), core_coins(100));

        let err = pull(150).unwrap_err();
        assert_eq!(code(&err), ("asset", 7));
    }

    #[test]
    fn test_locked_approval_is_frozen() {
        let app = TestApp::new();
        let owner_key = signer(1);
        let owner = AccountId::from(owner_key.address());
        let spender = AccountId::from(signer(2).address());
        app.fund(&owner, 1_000).unwrap();

        let approve = |amount| {
            send(
                &app,
                &owner_key,
                AssetMsg::Approve {
                    id: owner,
                    spender,
                    amount: core_coins(amount),
                    is_lock: true,
                },
            )
        };
        approve(300).unwrap();
        assert_eq!(code(&approve(100).unwrap_err()), ("asset", 24));
    }

    // =========================================================================
    // COIN POWER
    // =========================================================================

    #[test]
    fn test_fee_collector_exercises_collected_fees() {
        let app = TestApp::new();
        let alice = signer(1);
        let a = AccountId::from(alice.address());
        app.fund(&a, 1_000).unwrap();

        let msg = asset_msg(
            &AssetMsg::Transfer {
                from: a,
                to: a,
                amount: core_coins(1),
            },
            &[],
        )
        .unwrap();
        let raw = app.sign_raw(vec![msg], core_fee(25, 200_000), &[&alice]).unwrap();
        app.deliver_tx(&raw).unwrap();

        let collector = AccountId::from(Name::new("fee@kts").unwrap());
        let collector_key = signer(0xfe);
        send_as(
            &app,
            &collector_key,
            AssetMsg::Exercise {
                id: collector,
                amount: Coin::new(CORE_DENOM, 25),
            },
            &[collector_key.address()],
        )
        .unwrap();

        assert!(app.keeper().get_coin_powers(&collector).unwrap().is_zero());
        assert_eq!(app.keeper().get_coins(&collector).unwrap(), core_coins(25));
    }

    #[test]
    fn test_burn_reduces_supply() {
        let (app, alice) = app_with_alice();
        create_gold(&app, &alice, 10_000, 0).unwrap();
        issue(&app, &alice, 1_000).unwrap();

        send(
            &app,
            &alice.key,
            AssetMsg::Burn {
                id: alice.id,
                amount: Coin::new(GOLD, 400),
            },
        )
        .unwrap();

        assert_eq!(gold_of(&app, &alice.id), 600);
        let supply = app
            .keeper()
            .get_coin_total_supply(&name("alice"), &name("gold"))
            .unwrap();
        assert_eq!(supply.amount, 600);
    }
}
