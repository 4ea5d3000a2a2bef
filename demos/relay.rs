//! Prints cat, dog, fish in strict turn for 100 rounds.
//!
//! Run with: RUST_LOG=handoff=debug cargo run --example relay

use handoff::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> handoff::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let relay = RelayScheduler::builder()
        .rounds(100)
        .participant("cat", || println!("cat"))
        .participant("dog", || println!("dog"))
        .participant("fish", || println!("fish"))
        .build()?;

    let report = relay.run()?;
    println!("done: {} lines", report.total_actions());

    Ok(())
}
