//! Five workers, ten jobs, each printing whether its number is odd.
//!
//! Run with: RUST_LOG=handoff=debug cargo run --example worker_pool

use handoff::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> handoff::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_thread_names(true)
        .init();

    let pool = WorkerPool::new(5)?;
    pool.start()?;

    for num in 0..10 {
        pool.submit(move || {
            println!("Worker {}: {} is odd? {}", num % 5, num, num % 2 == 1);
        });
    }

    pool.wait();
    pool.stop();
    pool.join()?;

    for stats in pool.stats() {
        println!("worker {} ran {} jobs", stats.id, stats.jobs_executed);
    }

    Ok(())
}
