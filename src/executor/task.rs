//! Unit of work handed to the pool.

use crate::util::InFlightToken;

/// A submitted closure plus the in-flight token that accounts for it.
///
/// The token is released when the job is dropped, whether it ran, panicked,
/// or was never claimed by a worker.
pub(crate) struct Job {
    func: Box<dyn FnOnce() + Send + 'static>,
    token: InFlightToken,
}

impl Job {
    pub fn new<F>(f: F, token: InFlightToken) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Job {
            func: Box::new(f),
            token,
        }
    }

    /// Splits the job into its closure and its token so the caller controls
    /// when completion is recorded.
    pub fn into_parts(self) -> (Box<dyn FnOnce() + Send + 'static>, InFlightToken) {
        (self.func, self.token)
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job").finish_non_exhaustive()
    }
}
