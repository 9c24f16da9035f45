//! Performance benchmarks for record-guard.
//!
//! These benchmarks track:
//! - Cost of a full walk over a valid tree, by number of nested records
//! - Cost of an early rejection (fail-fast should not scale with size)
//! - Uniqueness checks on large repeated fields
//! - Guard checks under concurrent readers while options are replaced

#[path = "../tests/common/mod.rs"]
mod common;

use common::*;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use record_guard::prelude::*;
use std::sync::{Arc, Barrier};
use std::thread;

fn response_of(len: u64, invalid_at: Option<u64>) -> GetExperimentsResponse {
    GetExperimentsResponse {
        experiments: (0..len)
            .map(|id| {
                if Some(id) == invalid_at {
                    invalid_experiment(id)
                } else {
                    valid_experiment(id)
                }
            })
            .collect(),
    }
}

/// Benchmark a full walk over valid responses of growing size
fn benchmark_valid_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("valid_walk");
    for len in [1u64, 16, 256] {
        let response = response_of(len, None);
        group.throughput(Throughput::Elements(len));
        group.bench_with_input(BenchmarkId::from_parameter(len), &response, |b, response| {
            b.iter(|| black_box(response.validate()));
        });
    }
    group.finish();
}

/// Benchmark rejection on the first element of growing responses
fn benchmark_early_rejection(c: &mut Criterion) {
    let mut group = c.benchmark_group("early_rejection");
    for len in [1u64, 16, 256] {
        let response = response_of(len, Some(0));
        group.bench_with_input(BenchmarkId::from_parameter(len), &response, |b, response| {
            b.iter(|| black_box(response.validate()));
        });
    }
    group.finish();
}

/// Benchmark the uniqueness check on large repeated fields
fn benchmark_unique_ids(c: &mut Criterion) {
    let mut group = c.benchmark_group("unique_ids");
    for len in [1_000u64, 10_000, 100_000] {
        let request = StopExperimentsRequest {
            ids: (1..=len).collect(),
        };
        group.throughput(Throughput::Elements(len));
        group.bench_with_input(BenchmarkId::from_parameter(len), &request, |b, request| {
            b.iter(|| black_box(request.validate()));
        });
    }
    group.finish();
}

/// Benchmark building the rendered message of a nested violation
fn benchmark_error_render(c: &mut Criterion) {
    let err = response_of(4, Some(3)).validate().unwrap_err();

    let mut group = c.benchmark_group("error_render");
    group.bench_function("display", |b| b.iter(|| black_box(err.to_string())));
    group.bench_function("path", |b| b.iter(|| black_box(err.path())));
    group.finish();
}

/// Benchmark guard checks from several threads while options are swapped
fn benchmark_concurrent_guard(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_guard");
    for threads in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            let guard = Guard::default();
            let response = Arc::new(response_of(16, None));

            b.iter(|| {
                let barrier = Arc::new(Barrier::new(threads + 1));
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let guard = guard.clone();
                        let response = Arc::clone(&response);
                        let barrier = Arc::clone(&barrier);
                        thread::spawn(move || {
                            barrier.wait();
                            for _ in 0..100 {
                                black_box(guard.check_response(response.as_ref()).is_ok());
                            }
                        })
                    })
                    .collect();

                barrier.wait();
                guard.set_options(ValidationOptions::default().with_max_depth(16));

                for handle in handles {
                    let _ = handle.join();
                }
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_valid_walk,
    benchmark_early_rejection,
    benchmark_unique_ids,
    benchmark_error_render,
    benchmark_concurrent_guard
);
criterion_main!(benches);
