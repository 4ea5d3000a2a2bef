//! Stress tests, run with --ignored

use handoff::prelude::*;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
#[ignore]
fn stress_test_many_small_jobs() {
    let pool = WorkerPool::new(8).unwrap();
    pool.start().unwrap();

    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..100_000 {
        let counter = counter.clone();
        pool.submit(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
    }

    pool.wait();
    assert_eq!(counter.load(Ordering::Relaxed), 100_000);
    pool.shutdown().unwrap();
}

#[test]
#[ignore]
fn stress_test_repeated_wait_cycles() {
    let pool = WorkerPool::new(4).unwrap();
    pool.start().unwrap();

    let counter = Arc::new(AtomicUsize::new(0));
    for cycle in 1..=200 {
        for _ in 0..50 {
            let counter = counter.clone();
            pool.submit(move || {
                counter.fetch_add(1, Ordering::Relaxed);
            });
        }
        pool.wait();
        assert_eq!(counter.load(Ordering::Relaxed), cycle * 50);
    }

    pool.shutdown().unwrap();
}

#[test]
#[ignore]
fn stress_test_start_stop_cycles() {
    for _ in 0..100 {
        let pool = WorkerPool::new(4).unwrap();
        pool.start().unwrap();
        pool.submit(|| {});
        pool.wait();
        pool.shutdown().unwrap();
    }
}

#[test]
#[ignore]
fn stress_test_long_relay() {
    let last = Arc::new(Mutex::new(None));
    let mut builder = RelayScheduler::builder().rounds(100_000);
    for index in 0..4usize {
        let last = last.clone();
        builder = builder.participant(format!("p{}", index), move || {
            let mut last = last.lock();
            let expected = last.map_or(0, |prev: usize| (prev + 1) % 4);
            assert_eq!(index, expected);
            *last = Some(index);
        });
    }

    let report = builder.build().unwrap().run().unwrap();
    assert_eq!(report.total_actions(), 400_000);
}
