//! # Ante Chain Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | qc-10-signature | secp256k1 verify of one sign doc |
//! | qc-10-ante | full chain in check and simulate modes |
//! | qc-04-ledger | keeper transfer against the memory store |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qc_04_asset_ledger::AssetMsg;
use qc_10_ante_handler::{SignatureVerifier, Secp256k1Verifier, StdSignature, StdTx};
use qc_tests::app::{asset_msg, core_coins, core_fee, signer, TestApp};
use shared_types::AccountId;
use std::time::Duration;

fn bench_signature_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-10-signature");
    group.measurement_time(Duration::from_secs(5));

    let key = signer(7);
    let verifier = Secp256k1Verifier::new();
    let doc = br#"{"account_number":"0","chain_id":"testing","sequence":"0"}"#;
    let sig = key.sign(doc).unwrap();
    let pub_key = key.pub_key();

    group.bench_function("verify", |b| {
        b.iter(|| black_box(verifier.verify(&pub_key, doc, &sig)))
    });
    group.bench_function("address", |b| b.iter(|| black_box(verifier.address(&pub_key))));
    group.finish();
}

fn bench_ante_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-10-ante");

    for msgs in [1usize, 3, 6] {
        let app = TestApp::new();
        let alice = signer(1);
        let a = AccountId::from(alice.address());
        app.fund(&a, 1_000_000_000).unwrap();

        let transfer = AssetMsg::Transfer {
            from: a,
            to: a,
            amount: core_coins(1),
        };
        let envelopes: Vec<_> = (0..msgs).map(|_| asset_msg(&transfer, &[]).unwrap()).collect();

        // check bumps the sequence, so every iteration signs afresh
        group.throughput(Throughput::Elements(msgs as u64));
        group.bench_with_input(BenchmarkId::new("check_tx", msgs), &envelopes, |b, envs| {
            b.iter(|| {
                let raw = app.sign_raw(envs.clone(), core_fee(10, 1_000_000), &[&alice]).unwrap();
                black_box(app.check_tx(&raw).unwrap())
            })
        });

        let unsigned = StdTx::new(envelopes.clone(), core_fee(10, 1_000_000), vec![StdSignature::default()], "")
            .encode()
            .unwrap();
        group.bench_with_input(BenchmarkId::new("simulate", msgs), &unsigned, |b, raw| {
            b.iter(|| black_box(app.simulate(raw).unwrap()))
        });
    }

    group.finish();
}

fn bench_ledger_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-04-ledger");

    let app = TestApp::new();
    let from = AccountId::from(signer(1).address());
    let to = AccountId::from(signer(2).address());
    app.fund(&from, 1_000_000_000).unwrap();
    let keeper = app.keeper();
    let block = app.block();
    let one = core_coins(1);

    group.bench_function("transfer", |b| {
        b.iter(|| keeper.transfer(&block, &from, &to, black_box(&one)).unwrap())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_signature_verification,
    bench_ante_chain,
    bench_ledger_transfer
);
criterion_main!(benches);
