//! Job handoff throughput and relay round cost

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use handoff::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

fn bench_submit_wait(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit_wait");

    for workers in [1, 4, 8] {
        let pool = WorkerPool::new(workers).unwrap();
        pool.start().unwrap();
        let sink = Arc::new(AtomicU64::new(0));

        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, _| {
            b.iter(|| {
                for i in 0..1_000u64 {
                    let sink = sink.clone();
                    pool.submit(move || {
                        sink.fetch_add(black_box(i), Ordering::Relaxed);
                    });
                }
                pool.wait();
            });
        });

        pool.shutdown().unwrap();
    }

    group.finish();
}

fn bench_relay(c: &mut Criterion) {
    let mut group = c.benchmark_group("relay");

    for participants in [2usize, 3, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(participants),
            &participants,
            |b, &n| {
                b.iter(|| {
                    let mut builder = RelayScheduler::builder().rounds(1_000);
                    for i in 0..n {
                        builder = builder.participant(format!("p{}", i), || {
                            black_box(());
                        });
                    }
                    builder.build().unwrap().run().unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_submit_wait, bench_relay);
criterion_main!(benches);
