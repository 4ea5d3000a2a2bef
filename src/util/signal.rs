//! One-shot broadcast stop signal.
//!
//! Firing drops the only sender of a zero-capacity channel. Every receiver,
//! including ones cloned after the fact, then observes a disconnected channel,
//! so the stop state is never consumed by whoever sees it first.

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Inner {
    sender: Mutex<Option<Sender<()>>>,
    receiver: Receiver<()>,
    fired: AtomicBool,
}

/// Cloneable handle to a stop signal. All clones share the same state.
#[derive(Debug, Clone)]
pub struct StopSignal {
    inner: Arc<Inner>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (sender, receiver) = bounded(0);
        Self {
            inner: Arc::new(Inner {
                sender: Mutex::new(Some(sender)),
                receiver,
                fired: AtomicBool::new(false),
            }),
        }
    }

    /// Fires the signal. Returns `true` only for the call that actually fired it.
    pub fn fire(&self) -> bool {
        let sender = self.inner.sender.lock().take();
        match sender {
            Some(sender) => {
                self.inner.fired.store(true, Ordering::Release);
                drop(sender);
                true
            }
            None => false,
        }
    }

    pub fn is_fired(&self) -> bool {
        self.inner.fired.load(Ordering::Acquire)
    }

    /// Receiver for use in `select!`. It becomes ready, with a disconnect
    /// error, once the signal fires and stays ready forever after.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.inner.receiver
    }

    /// Blocks until the signal fires.
    pub fn wait(&self) {
        // nothing is ever sent, so recv only returns on disconnect
        let _ = self.inner.receiver.recv();
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}
