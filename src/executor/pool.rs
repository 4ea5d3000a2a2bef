use super::panic_handler::{PanicHandler, PanicInfo};
use super::task::Job;
use super::worker::{Worker, WorkerId, WorkerState, WorkerStats};
use crate::config::PoolConfig;
use crate::error::{Error, Result};
use crate::util::{InFlight, InFlightToken, StopSignal};
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Fixed-size pool of worker threads fed through one rendezvous channel.
///
/// The job channel has zero capacity: `submit` returns only once a worker has
/// taken the job, so each job is claimed by exactly one worker. Jobs complete
/// in no particular order.
///
/// # Deadlocks
///
/// `submit` blocks until a worker is idle. Submitting before [`start`] or
/// after every worker has been stopped therefore blocks forever. The pool
/// does not detect this; use [`submit_timeout`] where that can happen.
///
/// [`start`]: WorkerPool::start
/// [`submit_timeout`]: WorkerPool::submit_timeout
pub struct WorkerPool {
    config: PoolConfig,
    job_tx: Sender<Job>,
    // kept so the channel stays connected even after every worker has exited
    job_rx: Receiver<Job>,
    workers: Vec<WorkerHandle>,
    in_flight: Arc<InFlight>,
    panic_handler: Arc<PanicHandler>,
    started: AtomicBool,
}

struct WorkerHandle {
    id: WorkerId,
    // replaced with a fresh signal when a failed start is rolled back
    stop: Mutex<StopSignal>,
    state: Arc<WorkerState>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Creates a pool of `num_workers` workers. Zero is rejected.
    pub fn new(num_workers: usize) -> Result<Self> {
        let config = PoolConfig::builder().num_workers(num_workers).build()?;
        Self::with_config(config)
    }

    pub fn with_config(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        let num_workers = config.worker_count();
        if num_workers == 0 {
            return Err(Error::config("need at least 1 worker"));
        }

        let (job_tx, job_rx) = bounded(0);
        let panic_handler = Arc::new(PanicHandler::new(config.panic_strategy));

        let workers = (0..num_workers)
            .map(|id| WorkerHandle {
                id,
                stop: Mutex::new(StopSignal::new()),
                state: Arc::new(WorkerState::default()),
                thread: Mutex::new(None),
            })
            .collect();

        Ok(Self {
            config,
            job_tx,
            job_rx,
            workers,
            in_flight: Arc::new(InFlight::new()),
            panic_handler,
            started: AtomicBool::new(false),
        })
    }

    /// Spawns every worker thread. May be called once.
    ///
    /// If a thread fails to spawn, the workers already running are stopped
    /// and joined, and the pool is left unstarted so `start` can be retried.
    pub fn start(&self) -> Result<()> {
        let stack_size = self.config.stack_size;
        self.start_with(|name, worker| {
            let mut builder = thread::Builder::new().name(name);
            if let Some(stack_size) = stack_size {
                builder = builder.stack_size(stack_size);
            }
            builder.spawn(move || worker.run())
        })
    }

    fn start_with<S>(&self, mut spawn: S) -> Result<()>
    where
        S: FnMut(String, Worker) -> io::Result<JoinHandle<()>>,
    {
        if self
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::AlreadyStarted);
        }

        for handle in &self.workers {
            let worker = Worker::new(
                handle.id,
                self.job_rx.clone(),
                handle.stop.lock().clone(),
                handle.state.clone(),
                self.panic_handler.clone(),
            );

            let name = format!("{}-{}", self.config.thread_name_prefix, handle.id);
            match spawn(name, worker) {
                Ok(thread) => *handle.thread.lock() = Some(thread),
                Err(e) => {
                    tracing::error!(worker = handle.id, error = %e, "spawn failed");
                    self.roll_back_start();
                    return Err(Error::Spawn(e));
                }
            }
        }

        tracing::debug!(workers = self.workers.len(), "pool started");
        Ok(())
    }

    fn roll_back_start(&self) {
        let spawned: Vec<_> = self
            .workers
            .iter()
            .filter_map(|handle| {
                let thread = handle.thread.lock().take()?;
                handle.stop.lock().fire();
                Some(thread)
            })
            .collect();
        let count = spawned.len();

        for thread in spawned {
            // a worker that never ran a job has nothing to report
            let _ = thread.join();
        }
        for handle in &self.workers {
            *handle.stop.lock() = StopSignal::new();
        }

        self.started.store(false, Ordering::Release);
        tracing::debug!(joined = count, "start rolled back");
    }

    /// Hands `f` to an idle worker, blocking until one takes it.
    ///
    /// A panic inside `f` is handled on the worker and never reaches the
    /// caller; report outcomes from inside the closure if they matter.
    pub fn submit<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let job = Job::new(f, InFlightToken::acquire(&self.in_flight));
        if self.job_tx.send(job).is_err() {
            // unreachable while `job_rx` is held; the returned job releases its token
            tracing::error!("job channel disconnected");
        }
    }

    /// Like [`submit`](WorkerPool::submit), but gives up after `timeout`.
    ///
    /// On timeout the job is dropped unrun and the in-flight count is
    /// restored.
    pub fn submit_timeout<F>(&self, f: F, timeout: Duration) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let job = Job::new(f, InFlightToken::acquire(&self.in_flight));
        match self.job_tx.send_timeout(job, timeout) {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) | Err(SendTimeoutError::Disconnected(_)) => {
                tracing::debug!(?timeout, "submit timed out");
                Err(Error::SubmitTimeout(timeout))
            }
        }
    }

    /// Blocks until every job submitted so far has finished.
    pub fn wait(&self) {
        self.in_flight.wait();
    }

    /// Signals every worker to stop and returns immediately.
    ///
    /// Workers finish the job they are running first. A worker that is
    /// offered a job and the stop signal at the same moment may take either.
    pub fn stop(&self) {
        let fired = self.workers.iter().filter(|w| w.stop.lock().fire()).count();
        tracing::debug!(fired, "stop requested");
    }

    /// Signals a single worker to stop.
    pub fn stop_worker(&self, id: WorkerId) -> Result<()> {
        let handle = self.workers.get(id).ok_or(Error::UnknownWorker(id))?;
        handle.stop.lock().fire();
        tracing::debug!(worker = id, "stop requested");
        Ok(())
    }

    /// Waits for every started worker thread to exit.
    ///
    /// Blocks forever if some worker was never stopped. When called from a
    /// worker thread, for instance because a job dropped the last handle to
    /// the pool, that worker's own thread is skipped.
    pub fn join(&self) -> Result<()> {
        let current = thread::current().id();
        let mut first_err = None;

        for handle in &self.workers {
            let thread = {
                let mut slot = handle.thread.lock();
                match slot.as_ref() {
                    Some(t) if t.thread().id() == current => {
                        tracing::debug!(worker = handle.id, "not joining the calling worker");
                        None
                    }
                    _ => slot.take(),
                }
            };
            if let Some(thread) = thread {
                if let Err(payload) = thread.join() {
                    let info = PanicInfo::from_payload(payload);
                    tracing::error!(
                        worker = handle.id,
                        message = %info.message,
                        "worker thread panicked"
                    );
                    first_err.get_or_insert(Error::WorkerPanic(info.message));
                }
            }
        }

        first_err.map_or(Ok(()), Err)
    }

    /// Stops every worker and waits for them to exit.
    pub fn shutdown(&self) -> Result<()> {
        self.stop();
        self.join()
    }

    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    pub fn panic_count(&self) -> usize {
        self.panic_handler.panic_count()
    }

    pub fn stats(&self) -> Vec<WorkerStats> {
        self.workers
            .iter()
            .map(|w| w.state.snapshot(w.id))
            .collect()
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("num_workers", &self.workers.len())
            .field("started", &self.is_started())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
