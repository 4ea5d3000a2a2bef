// worker thread stuff
use super::panic_handler::PanicHandler;
use super::task::Job;
use crate::util::StopSignal;
use crossbeam_channel::{select, Receiver};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type WorkerId = usize;

// stats for each worker
#[derive(Debug, Default)]
pub struct WorkerState {
    pub jobs_executed: AtomicU64,
    pub jobs_panicked: AtomicU64,
    last_panic: Mutex<Option<String>>,
}

/// Point-in-time copy of one worker's counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerStats {
    pub id: WorkerId,
    pub jobs_executed: u64,
    pub jobs_panicked: u64,
    /// Message of the most recent job that panicked on this worker.
    pub last_panic: Option<String>,
}

impl WorkerState {
    pub fn snapshot(&self, id: WorkerId) -> WorkerStats {
        WorkerStats {
            id,
            jobs_executed: self.jobs_executed.load(Ordering::Relaxed),
            jobs_panicked: self.jobs_panicked.load(Ordering::Relaxed),
            last_panic: self.last_panic.lock().clone(),
        }
    }
}

pub(crate) struct Worker {
    pub id: WorkerId,
    jobs: Receiver<Job>,
    stop: StopSignal,
    state: Arc<WorkerState>,
    panic_handler: Arc<PanicHandler>,
}

impl Worker {
    pub fn new(
        id: WorkerId,
        jobs: Receiver<Job>,
        stop: StopSignal,
        state: Arc<WorkerState>,
        panic_handler: Arc<PanicHandler>,
    ) -> Self {
        Self {
            id,
            jobs,
            stop,
            state,
            panic_handler,
        }
    }

    // main loop; stop is only observed between jobs
    pub fn run(self) {
        tracing::debug!(worker = self.id, "worker started");

        loop {
            select! {
                recv(self.jobs) -> msg => match msg {
                    Ok(job) => self.execute(job),
                    Err(_) => {
                        tracing::debug!(worker = self.id, "job channel closed");
                        break;
                    }
                },
                recv(self.stop.receiver()) -> _ => break,
            }
        }

        tracing::debug!(
            worker = self.id,
            executed = self.state.jobs_executed.load(Ordering::Relaxed),
            "worker stopped"
        );
    }

    fn execute(&self, job: Job) {
        let (func, token) = job.into_parts();
        tracing::trace!(worker = self.id, "running job");

        if let Err(info) = self.panic_handler.contain(self.id, func) {
            self.state.jobs_panicked.fetch_add(1, Ordering::Relaxed);
            *self.state.last_panic.lock() = Some(info.message);
        }
        self.state.jobs_executed.fetch_add(1, Ordering::Relaxed);

        // completion is recorded only after the stats, so `wait` sees them
        drop(token);
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("stopped", &self.stop.is_fired())
            .finish()
    }
}
