//! handoff - channel-driven work distribution and ordering
//!
//! Two small concurrency components built on bounded channels:
//!
//! - [`WorkerPool`]: a fixed set of worker threads that claim jobs from one
//!   zero-capacity channel. `submit` blocks until a worker takes the job,
//!   `wait` blocks until every submitted job has finished, and `stop` asks
//!   each worker to exit between jobs.
//! - [`RelayScheduler`]: a ring of participants that act strictly in turn,
//!   passing a single baton through single-slot channels.
//!
//! # Quick Start
//!
//! ```no_run
//! use handoff::prelude::*;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let pool = WorkerPool::new(5).unwrap();
//! pool.start().unwrap();
//!
//! let counter = Arc::new(AtomicUsize::new(0));
//! for _ in 0..10 {
//!     let counter = counter.clone();
//!     pool.submit(move || {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     });
//! }
//!
//! pool.wait();
//! assert_eq!(counter.load(Ordering::SeqCst), 10);
//! pool.shutdown().unwrap();
//! ```
//!
//! # Logging
//!
//! Lifecycle events are emitted through `tracing`. The crate never installs a
//! subscriber.

#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod relay;
pub mod util;

pub use config::{PoolConfig, PoolConfigBuilder, RelayConfig};
pub use error::{Error, Result};
pub use executor::{PanicStrategy, WorkerPool};
pub use relay::{RelayBuilder, RelayReport, RelayScheduler};
pub use util::StopSignal;
