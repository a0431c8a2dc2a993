use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use num_bigint::BigInt;
use rand::{rngs::OsRng, thread_rng};
use secshare::{combine_shares, Cluster, Mode, Operations, Parameters, Plaintext, SecretKey};
use secshare_traits::Serialize;

fn bench_ciphertext_sizes(c: &mut Criterion) {
    let group = c.benchmark_group("Ciphertext Sizes");

    println!("\n=== CIPHERTEXT SIZES ===");
    let text = "The quick brown fox jumps over the lazy dog";
    for nodes in [1, 3, 5, 10] {
        let cluster = Cluster::new(nodes).unwrap();
        let sk = SecretKey::generate(&cluster, Mode::ALL.into_iter().collect(), None).unwrap();
        let sum = sk
            .encrypt(Mode::Sum, &Plaintext::from(123_456_789), &mut OsRng)
            .unwrap();
        let store = sk.encrypt(Mode::Store, &Plaintext::from(text), &mut OsRng).unwrap();
        let matching = sk.encrypt(Mode::Match, &Plaintext::from(text), &mut OsRng).unwrap();
        println!(
            "{} nodes: SUM {} bytes, STORE {} bytes ({} chars), MATCH {} bytes",
            nodes,
            sum.to_bytes().len(),
            store.to_bytes().len(),
            text.len(),
            matching.to_bytes().len()
        );
    }

    group.finish();
}

fn bench_timing_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("Secret Sharing Timing");
    let par = Parameters::default_arc();

    for nodes in [3, 10] {
        let cluster = Cluster::new(nodes).unwrap();

        group.bench_function(BenchmarkId::new("generate_key", nodes), |b| {
            b.iter(|| SecretKey::generate(&cluster, Operations::only(Mode::Sum), None).unwrap());
        });

        let sk = SecretKey::generate(&cluster, Mode::ALL.into_iter().collect(), None).unwrap();
        let pt = Plaintext::from(-987_654_321);

        group.bench_function(BenchmarkId::new("encrypt_sum", nodes), |b| {
            b.iter(|| sk.encrypt(Mode::Sum, &pt, &mut thread_rng()).unwrap());
        });

        let ct = sk.encrypt(Mode::Sum, &pt, &mut thread_rng()).unwrap();
        group.bench_function(BenchmarkId::new("decrypt_sum", nodes), |b| {
            b.iter(|| sk.decrypt(&ct).unwrap());
        });

        let text = Plaintext::from("x".repeat(256));
        group.bench_function(BenchmarkId::new("encrypt_store_256", nodes), |b| {
            b.iter(|| sk.encrypt(Mode::Store, &text, &mut thread_rng()).unwrap());
        });

        let ct = sk.encrypt(Mode::Store, &text, &mut thread_rng()).unwrap();
        group.bench_function(BenchmarkId::new("decrypt_store_256", nodes), |b| {
            b.iter(|| sk.decrypt(&ct).unwrap());
        });

        group.bench_function(BenchmarkId::new("encrypt_match", nodes), |b| {
            b.iter(|| sk.encrypt(Mode::Match, &text, &mut thread_rng()).unwrap());
        });

        let a: Vec<BigInt> = sk
            .encrypt(Mode::Sum, &pt, &mut thread_rng())
            .unwrap()
            .shares()
            .unwrap()
            .iter()
            .map(|s| BigInt::from(s.clone()))
            .collect();
        group.bench_function(BenchmarkId::new("combine_shares", nodes), |b| {
            b.iter(|| combine_shares(&a, &a, par.modulus()).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ciphertext_sizes, bench_timing_operations);
criterion_main!(benches);
