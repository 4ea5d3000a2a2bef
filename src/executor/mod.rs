//! Worker pool.
//!
//! A fixed set of worker threads pulls jobs from one zero-capacity channel,
//! runs each to completion under a panic handler, and watches a private stop
//! signal between jobs.

pub mod panic_handler;
pub mod pool;
pub(crate) mod task;
pub mod worker;

pub use panic_handler::{PanicHandler, PanicInfo, PanicStrategy};
pub use pool::WorkerPool;
pub use worker::{WorkerId, WorkerStats};
