//! Containment of panics raised by jobs.
//!
//! A job that panics never takes its worker down: the panic is caught,
//! counted, optionally logged, and turned into a [`PanicInfo`] for the worker's
//! stats. There is deliberately no strategy that aborts the process.

use super::worker::WorkerId;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

/// What a worker reports when a job panics. Either way the worker keeps
/// serving jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanicStrategy {
    /// Emit a `warn` event naming the worker and the panic message.
    #[default]
    LogAndContinue,
    /// Record the panic in the stats only.
    Isolate,
}

#[derive(Debug)]
pub struct PanicHandler {
    strategy: PanicStrategy,
    panic_count: AtomicUsize,
}

impl PanicHandler {
    pub fn new(strategy: PanicStrategy) -> Self {
        Self {
            strategy,
            panic_count: AtomicUsize::new(0),
        }
    }

    /// Runs `job` on the calling worker, catching any panic it raises.
    pub fn contain<F>(&self, worker: WorkerId, job: F) -> Result<(), PanicInfo>
    where
        F: FnOnce(),
    {
        let payload = match catch_unwind(AssertUnwindSafe(job)) {
            Ok(()) => return Ok(()),
            Err(payload) => payload,
        };

        self.panic_count.fetch_add(1, Ordering::Relaxed);
        let info = PanicInfo::from_payload(payload);

        if self.strategy == PanicStrategy::LogAndContinue {
            tracing::warn!(worker, message = %info.message, "job panicked");
        }

        Err(info)
    }

    pub fn panic_count(&self) -> usize {
        self.panic_count.load(Ordering::Relaxed)
    }

    pub fn strategy(&self) -> PanicStrategy {
        self.strategy
    }
}

impl Default for PanicHandler {
    fn default() -> Self {
        Self::new(PanicStrategy::default())
    }
}

/// Message extracted from a panic payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanicInfo {
    pub message: String,
}

impl PanicInfo {
    pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(s) => *s,
            Err(payload) => match payload.downcast_ref::<&str>() {
                Some(s) => s.to_string(),
                None => "non-string panic payload".to_string(),
            },
        };

        Self { message }
    }
}
