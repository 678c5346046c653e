//! Benchmarks for the winner-entailment verifier
//!
//! Measures the full state-table fill at growing candidate counts for:
//! - a winner that beats everyone in every state (every state reachable)
//! - a chain of exact-context assertions (a single path survives)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use irv_assertions::{Assertion, CandidateId, CandidateSet};
use irv_verifier::Verifier;

fn dominant_winner(count: usize) -> Vec<Assertion> {
    (1..count)
        .map(|i| Assertion::universal(CandidateId(0), CandidateId(i)))
        .collect()
}

/// Eliminate the highest index first, each step licensed only in the
/// exact state where it happens.
fn exact_chain(count: usize) -> Vec<Assertion> {
    (1..count)
        .rev()
        .map(|i| Assertion::exact(CandidateId(0), CandidateId(i), CandidateSet::full(i + 1)))
        .collect()
}

fn bench_dominant(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify_dominant");

    for &count in &[4usize, 8, 12, 16] {
        let assertions = dominant_winner(count);
        group.throughput(Throughput::Elements(1u64 << count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &assertions, |b, a| {
            b.iter(|| {
                Verifier::new(black_box(a), count, CandidateId(0))
                    .map(|v| v.witness())
            })
        });
    }
    group.finish();
}

fn bench_exact_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify_exact_chain");

    for &count in &[4usize, 8, 12, 16] {
        let assertions = exact_chain(count);
        group.throughput(Throughput::Elements(1u64 << count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &assertions, |b, a| {
            b.iter(|| {
                Verifier::new(black_box(a), count, CandidateId(0))
                    .map(|v| v.witness())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_dominant, bench_exact_chain);
criterion_main!(benches);
