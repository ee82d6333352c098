//! # Ante Chain Flows
//!
//! Signed transactions delivered through [`TestApp`]:
//!
//! - fees move into the collector's coin power and stay charged when a
//!   message fails
//! - sequences advance once per delivered tx; replays are rejected
//! - fee payers must sign, directly or through a name's auth address
//! - mempool prices apply to check only
//! - check and simulate runs leave sequences and keys untouched

#[cfg(test)]
mod tests {
    use crate::app::*;
    use qc_04_asset_ledger::AssetMsg;
    use qc_10_ante_handler::domain::config::parse_gas_prices;
    use qc_10_ante_handler::{Msg, StdSignature, StdTx};
    use shared_types::{AccountId, Coin, ErrorCode};

    fn transfer(from: AccountId, to: AccountId, amount: u128) -> AssetMsg {
        AssetMsg::Transfer {
            from,
            to,
            amount: core_coins(amount),
        }
    }

    fn balance(app: &TestApp, id: &AccountId) -> u128 {
        app.keeper().get_coins(id).unwrap().amount_of(CORE_DENOM)
    }

    fn collected(app: &TestApp) -> u128 {
        let collector = app.ledger_config.fee_collector;
        app.keeper().get_coin_powers(&collector).unwrap().amount_of(CORE_DENOM)
    }

    fn sequence(app: &TestApp, key: &qc_10_ante_handler::Secp256k1Signer) -> u64 {
        app.accounts.auth_record(&key.address()).unwrap().map(|r| r.sequence).unwrap_or(0)
    }

    // =========================================================================
    // FEES AND SEQUENCES
    // =========================================================================

    #[test]
    fn test_transfer_pays_fee_and_bumps_sequence() {
        let app = TestApp::new();
        let (alice, bob) = (signer(1), signer(2));
        let (from, to) = (AccountId::from(alice.address()), AccountId::from(bob.address()));
        app.fund(&from, 1_000).unwrap();

        let msg = asset_msg(&transfer(from, to, 100), &[]).unwrap();
        let raw = app.sign_raw(vec![msg], core_fee(10, 200_000), &[&alice]).unwrap();
        let events = app.deliver_tx(&raw).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, "transfer");
        assert_eq!(balance(&app, &from), 890);
        assert_eq!(balance(&app, &to), 100);
        assert_eq!(collected(&app), 10);
        assert_eq!(sequence(&app, &alice), 1);
        assert_eq!(app.accounts.auth_record(&alice.address()).unwrap().unwrap().pub_key, Some(alice.pub_key()));
    }

    #[test]
    fn test_failed_message_keeps_fee_and_sequence() {
        let app = TestApp::new();
        let (alice, bob) = (signer(1), signer(2));
        let (from, to) = (AccountId::from(alice.address()), AccountId::from(bob.address()));
        app.fund(&from, 1_000).unwrap();

        let msg = asset_msg(&transfer(from, to, 5_000), &[]).unwrap();
        let raw = app.sign_raw(vec![msg], core_fee(10, 200_000), &[&alice]).unwrap();
        let err = app.deliver_tx(&raw).unwrap_err();

        assert_eq!((err.codespace(), err.code()), ("asset", 7));
        assert_eq!(balance(&app, &from), 990);
        assert_eq!(balance(&app, &to), 0);
        assert_eq!(collected(&app), 10);
        assert_eq!(sequence(&app, &alice), 1);
    }

    #[test]
    fn test_replay_is_rejected_without_charge() {
        let mut app = TestApp::new();
        let (alice, bob) = (signer(1), signer(2));
        let (from, to) = (AccountId::from(alice.address()), AccountId::from(bob.address()));
        app.fund(&from, 1_000).unwrap();

        let msg = asset_msg(&transfer(from, to, 100), &[]).unwrap();
        let raw = app.sign_raw(vec![msg], core_fee(10, 200_000), &[&alice]).unwrap();
        app.deliver_tx(&raw).unwrap();

        app.next_block();
        let err = app.deliver_tx(&raw).unwrap_err();
        assert_eq!((err.codespace(), err.code()), ("sdk", 4));
        assert_eq!(balance(&app, &from), 890);
        assert_eq!(collected(&app), 10);
        assert_eq!(sequence(&app, &alice), 1);
    }

    #[test]
    fn test_two_signers_both_advance() {
        let app = TestApp::new();
        let (alice, bob, carol) = (signer(1), signer(2), signer(3));
        let a = AccountId::from(alice.address());
        let b = AccountId::from(bob.address());
        let c = AccountId::from(carol.address());
        app.fund(&a, 1_000).unwrap();
        app.fund(&b, 1_000).unwrap();

        let msgs = vec![
            asset_msg(&transfer(a, c, 10), &[]).unwrap(),
            asset_msg(&transfer(b, c, 20), &[]).unwrap(),
        ];
        let raw = app.sign_raw(msgs, core_fee(10, 200_000), &[&alice, &bob]).unwrap();
        app.deliver_tx(&raw).unwrap();

        // first signer pays
        assert_eq!(balance(&app, &a), 980);
        assert_eq!(balance(&app, &b), 980);
        assert_eq!(balance(&app, &c), 30);
        assert_eq!((sequence(&app, &alice), sequence(&app, &bob)), (1, 1));
    }

    #[test]
    fn test_signatures_out_of_order_rejected() {
        let app = TestApp::new();
        let (alice, bob) = (signer(1), signer(2));
        let a = AccountId::from(alice.address());
        let b = AccountId::from(bob.address());
        app.fund(&a, 1_000).unwrap();
        app.fund(&b, 1_000).unwrap();

        let msgs = vec![
            asset_msg(&transfer(a, b, 10), &[]).unwrap(),
            asset_msg(&transfer(b, a, 10), &[]).unwrap(),
        ];
        let raw = app.sign_raw(msgs, core_fee(10, 200_000), &[&bob, &alice]).unwrap();
        let err = app.deliver_tx(&raw).unwrap_err();
        // bob's key in alice's slot
        assert_eq!((err.codespace(), err.code()), ("sdk", 8));
        assert_eq!(balance(&app, &a), 1_000);
    }

    // =========================================================================
    // FEE PAYER
    // =========================================================================

    #[test]
    fn test_payer_address_must_sign() {
        let app = TestApp::new();
        let (alice, carol) = (signer(1), signer(3));
        let a = AccountId::from(alice.address());
        let c = AccountId::from(carol.address());
        app.fund(&a, 1_000).unwrap();
        app.fund(&c, 1_000).unwrap();

        let msg = asset_msg(&transfer(a, c, 10), &[]).unwrap();
        let fee = core_fee(10, 200_000).with_payer(c);
        let raw = app.sign_raw(vec![msg], fee, &[&alice]).unwrap();

        let err = app.deliver_tx(&raw).unwrap_err();
        assert_eq!((err.codespace(), err.code()), ("sdk", 4));
        assert_eq!(balance(&app, &c), 1_000);
        assert_eq!(sequence(&app, &alice), 0);
    }

    #[test]
    fn test_name_payer_through_auth() {
        let app = TestApp::new();
        let kratos = AccountId::from(name("kratos"));
        let alice = AccountId::from(signer(1).address());
        app.keeper()
            .issue(&app.block(), &name("kratos"), &name("kts"), Coin::new(CORE_DENOM, 1_000))
            .unwrap();

        let msg = asset_msg(&transfer(kratos, alice, 100), &[app.core().address()]).unwrap();
        let fee = core_fee(10, 200_000).with_payer(kratos);
        let raw = app.sign_raw(vec![msg], fee, &[app.core()]).unwrap();
        app.deliver_tx(&raw).unwrap();

        assert_eq!(balance(&app, &kratos), 890);
        assert_eq!(balance(&app, &alice), 100);
    }

    #[test]
    fn test_unknown_name_payer() {
        let app = TestApp::new();
        let alice = signer(1);
        let a = AccountId::from(alice.address());
        app.fund(&a, 1_000).unwrap();

        let msg = asset_msg(&transfer(a, a, 1), &[]).unwrap();
        let fee = core_fee(10, 200_000).with_payer(AccountId::from(name("nobody")));
        let raw = app.sign_raw(vec![msg], fee, &[&alice]).unwrap();

        let err = app.deliver_tx(&raw).unwrap_err();
        assert_eq!((err.codespace(), err.code()), ("sdk", 9));
    }

    #[test]
    fn test_unfunded_payer() {
        let app = TestApp::new();
        let alice = signer(1);
        let a = AccountId::from(alice.address());

        let msg = asset_msg(&transfer(a, a, 1), &[]).unwrap();
        let raw = app.sign_raw(vec![msg], core_fee(10, 200_000), &[&alice]).unwrap();
        let err = app.deliver_tx(&raw).unwrap_err();
        assert_eq!((err.codespace(), err.code()), ("sdk", 5));
    }

    // =========================================================================
    // MODES AND GAS
    // =========================================================================

    #[test]
    fn test_min_gas_prices_apply_to_check_only() {
        let mut app = TestApp::new();
        app.config.min_gas_prices = parse_gas_prices("0.001kratos/kts").unwrap();
        let alice = signer(1);
        let a = AccountId::from(alice.address());
        app.fund(&a, 1_000).unwrap();

        // 0.001 * 200_000 = 200 required
        let msg = asset_msg(&transfer(a, a, 1), &[]).unwrap();
        let cheap = app.sign_raw(vec![msg.clone()], core_fee(10, 200_000), &[&alice]).unwrap();
        let err = app.check_tx(&cheap).unwrap_err();
        assert_eq!((err.codespace(), err.code()), ("sdk", 13));

        // check discards ledger writes
        assert_eq!(balance(&app, &a), 1_000);

        app.deliver_tx(&cheap).unwrap();
        assert_eq!(balance(&app, &a), 990);

        let enough = app.sign_raw(vec![msg], core_fee(200, 200_000), &[&alice]).unwrap();
        assert!(app.check_tx(&enough).unwrap() > 0);
        assert_eq!(balance(&app, &a), 990);
    }

    #[test]
    fn test_simulate_pads_missing_signatures() {
        let app = TestApp::new();
        let alice = signer(1);
        let a = AccountId::from(alice.address());
        app.fund(&a, 1_000).unwrap();

        let msg = asset_msg(&transfer(a, a, 1), &[]).unwrap();
        let tx = StdTx::new(vec![msg], core_fee(10, 200_000), vec![StdSignature::default()], "");
        let raw = tx.encode().unwrap();

        let gas = app.simulate(&raw).unwrap();
        assert_eq!(gas, 10 * (raw.len() as u64 + 33 + 64));
        assert_eq!(balance(&app, &a), 1_000);
    }

    #[test]
    fn test_gas_limit_below_size_cost() {
        let app = TestApp::new();
        let alice = signer(1);
        let a = AccountId::from(alice.address());
        app.fund(&a, 1_000).unwrap();

        let msg = asset_msg(&transfer(a, a, 1), &[]).unwrap();
        let raw = app.sign_raw(vec![msg], core_fee(10, 100), &[&alice]).unwrap();
        let err = app.deliver_tx(&raw).unwrap_err();
        assert!(err.is_out_of_gas());
        assert_eq!(balance(&app, &a), 1_000);
    }

    #[test]
    fn test_signature_bound_to_chain_id() {
        let mut app = TestApp::new();
        let alice = signer(1);
        let a = AccountId::from(alice.address());
        app.fund(&a, 1_000).unwrap();

        let msg = asset_msg(&transfer(a, a, 1), &[]).unwrap();
        app.config.chain_id = "other-chain".into();
        let raw = app.sign_raw(vec![msg], core_fee(10, 200_000), &[&alice]).unwrap();
        app.config.chain_id = "testing".into();

        let err = app.deliver_tx(&raw).unwrap_err();
        assert_eq!((err.codespace(), err.code()), ("sdk", 4));

        // the key stored before verification failed is rolled back with the fee
        assert!(app.accounts.auth_record(&alice.address()).unwrap().unwrap().pub_key.is_none());
        assert_eq!(sequence(&app, &alice), 0);
        assert_eq!(balance(&app, &a), 1_000);
    }

    #[test]
    fn test_check_then_deliver_same_tx() {
        let app = TestApp::new();
        let (alice, bob) = (signer(1), signer(2));
        let (from, to) = (AccountId::from(alice.address()), AccountId::from(bob.address()));
        app.fund(&from, 1_000).unwrap();

        let msg = asset_msg(&transfer(from, to, 100), &[]).unwrap();
        let raw = app.sign_raw(vec![msg], core_fee(10, 200_000), &[&alice]).unwrap();

        app.check_tx(&raw).unwrap();
        assert_eq!(sequence(&app, &alice), 0);
        assert!(app.accounts.auth_record(&alice.address()).unwrap().unwrap().pub_key.is_none());

        app.deliver_tx(&raw).unwrap();
        assert_eq!(sequence(&app, &alice), 1);
        assert_eq!(balance(&app, &from), 890);
        assert_eq!(balance(&app, &to), 100);
    }

    #[test]
    fn test_simulate_then_deliver_same_tx() {
        let app = TestApp::new();
        let (alice, bob) = (signer(1), signer(2));
        let (from, to) = (AccountId::from(alice.address()), AccountId::from(bob.address()));
        app.fund(&from, 1_000).unwrap();

        let msg = asset_msg(&transfer(from, to, 100), &[]).unwrap();
        let signed = app.sign(vec![msg], core_fee(10, 200_000), &[&alice]).unwrap();
        let raw = signed.encode().unwrap();

        assert!(app.simulate(&raw).unwrap() > 0);
        assert!(app.simulate(&raw).unwrap() > 0);
        assert_eq!(sequence(&app, &alice), 0);

        app.deliver_tx(&raw).unwrap();
        assert_eq!(sequence(&app, &alice), 1);
        assert_eq!(collected(&app), 10);
    }

    // =========================================================================
    // ROUTING
    // =========================================================================

    #[test]
    fn test_unknown_router_after_fee() {
        let app = TestApp::new();
        let alice = signer(1);
        let a = AccountId::from(alice.address());
        app.fund(&a, 1_000).unwrap();

        let msg = Msg::new("bank", "send").with_auth(alice.address());
        let raw = app.sign_raw(vec![msg], core_fee(10, 200_000), &[&alice]).unwrap();
        let err = app.deliver_tx(&raw).unwrap_err();

        assert_eq!((err.codespace(), err.code()), ("sdk", 6));
        assert_eq!(balance(&app, &a), 990);
    }

    #[test]
    fn test_envelope_must_match_payload_transfer() {
        let app = TestApp::new();
        let (alice, bob) = (signer(1), signer(2));
        let a = AccountId::from(alice.address());
        let b = AccountId::from(bob.address());
        app.fund(&a, 1_000).unwrap();

        let mut msg = asset_msg(&transfer(a, b, 100), &[]).unwrap();
        msg.amount = core_coins(1);
        let raw = app.sign_raw(vec![msg], core_fee(10, 200_000), &[&alice]).unwrap();
        let err = app.deliver_tx(&raw).unwrap_err();

        assert_eq!((err.codespace(), err.code()), ("sdk", 18));
        assert_eq!(balance(&app, &b), 0);
    }
}
