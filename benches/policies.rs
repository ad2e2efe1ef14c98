//! Replay throughput of every policy across synthetic workloads.
//!
//! Run with: `cargo bench --bench policies`

mod common;

use common::workload::{Workload, WorkloadSpec};
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pagesim::builder::{CacheBuilder, CachePolicy};
use pagesim::policy::ideal::IdealCache;
use pagesim::sim::replay;
use pagesim::traits::PagingCache;

const TRACE_LEN: usize = 16_384;
const UNIVERSE: u64 = 4_096;
const CAPACITY: usize = 512;

fn workloads() -> [Workload; 4] {
    [
        Workload::Uniform,
        Workload::Hotset {
            hot_fraction: 0.1,
            hot_prob: 0.9,
        },
        Workload::Scan,
        Workload::Zipfian { theta: 0.99 },
    ]
}

fn trace_for(workload: Workload) -> Vec<u64> {
    WorkloadSpec {
        universe: UNIVERSE,
        workload,
        seed: 0x5eed,
    }
    .trace(TRACE_LEN)
}

// ============================================================================
// Full replay per policy
// ============================================================================

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");
    group.throughput(Throughput::Elements(TRACE_LEN as u64));

    for workload in workloads() {
        let trace = trace_for(workload);
        for policy in CachePolicy::ALL {
            group.bench_with_input(
                BenchmarkId::new(policy.name(), workload.name()),
                &trace,
                |b, trace| {
                    b.iter_batched(
                        || CacheBuilder::new(CAPACITY).build::<u64, u64>(policy),
                        |mut cache| std::hint::black_box(replay(&mut cache, trace, |k| *k)),
                        BatchSize::SmallInput,
                    )
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// Ideal victim scan cost as capacity grows
// ============================================================================

fn bench_ideal_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("ideal_capacity");
    let trace = trace_for(Workload::Uniform);
    group.throughput(Throughput::Elements(TRACE_LEN as u64));

    for capacity in [64usize, 256, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &trace, |b, trace| {
            b.iter_batched(
                || IdealCache::<u64, ()>::with_future(capacity, trace.iter().copied()),
                |mut cache| {
                    for &key in trace {
                        std::hint::black_box(cache.lookup_update(key, |_| ()));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_replay, bench_ideal_capacity);
criterion_main!(benches);
