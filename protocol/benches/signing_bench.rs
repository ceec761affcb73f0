// Signing & verification benchmarks.
//
// Covers Ed25519 keypair generation, raw sign/verify, transaction sealing and
// signing, and multi-signer verification at various sizes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ledger_tx::account::Account;
use ledger_tx::config::Network;
use ledger_tx::crypto::signatures::{sign, verify};
use ledger_tx::crypto::Keypair;
use ledger_tx::operation::{OperationSpec, PaymentOptions};
use ledger_tx::transaction::{Transaction, TransactionBuilder};

const DESTINATION: &str = "GCEZWKCA5VLDNRLN3RPRJMRZOX3Z6G5CHCGSNFHEYVXM3XOJMDS674JZ";

fn payment() -> OperationSpec {
    OperationSpec::Payment(PaymentOptions {
        destination: DESTINATION.into(),
        amount: "12.5".into(),
        source: None,
    })
}

fn sealed_transaction(keypair: &Keypair, operations: usize) -> Transaction {
    let mut account = Account::new(&keypair.account_id(), "1").unwrap();
    let mut tx = TransactionBuilder::new(&mut account)
        .operations((0..operations).map(|_| payment()))
        .build()
        .unwrap();
    tx.seal(&Network::testnet()).unwrap();
    tx
}

fn bench_keypair_generation(c: &mut Criterion) {
    c.bench_function("ed25519/keypair_generate", |b| {
        b.iter(Keypair::random);
    });
}

fn bench_sign_message(c: &mut Criterion) {
    let keypair = Keypair::random();
    let message = [7u8; 32];

    c.bench_function("ed25519/sign_hash", |b| {
        b.iter(|| sign(&keypair, &message));
    });
}

fn bench_verify_signature(c: &mut Criterion) {
    let keypair = Keypair::random();
    let message = [7u8; 32];
    let signature = sign(&keypair, &message);
    let public_key = keypair.public_key();

    c.bench_function("ed25519/verify_hash", |b| {
        b.iter(|| verify(&public_key, &message, &signature));
    });
}

fn bench_seal_and_sign(c: &mut Criterion) {
    let keypair = Keypair::random();
    let network = Network::testnet();
    let mut group = c.benchmark_group("transaction/seal_and_sign");

    for ops in [1, 10, 100] {
        group.throughput(Throughput::Elements(ops as u64));
        group.bench_with_input(BenchmarkId::from_parameter(ops), &ops, |b, &ops| {
            b.iter(|| {
                let mut account = Account::new(&keypair.account_id(), "1").unwrap();
                let mut tx = TransactionBuilder::new(&mut account)
                    .operations((0..ops).map(|_| payment()))
                    .build()
                    .unwrap();
                tx.seal(&network).unwrap();
                tx.sign(&keypair).unwrap();
                tx
            });
        });
    }

    group.finish();
}

fn bench_verify_signers(c: &mut Criterion) {
    let mut group = c.benchmark_group("transaction/verify_signatures");

    for signers in [1, 5, 20] {
        let owner = Keypair::random();
        let mut tx = sealed_transaction(&owner, 1);
        let keys: Vec<_> = (0..signers)
            .map(|_| {
                let kp = Keypair::random();
                tx.sign(&kp).unwrap();
                kp.public_key()
            })
            .collect();

        group.throughput(Throughput::Elements(signers as u64));
        group.bench_with_input(BenchmarkId::from_parameter(signers), &keys, |b, keys| {
            b.iter(|| tx.verify_signatures(keys));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_keypair_generation,
    bench_sign_message,
    bench_verify_signature,
    bench_seal_and_sign,
    bench_verify_signers,
);
criterion_main!(benches);
