//! Count of submitted-but-not-completed jobs.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// In-flight counter with a blocking wait for zero.
///
/// The count itself is a plain atomic; the mutex and condvar exist only to
/// park `wait` callers. A decrement that reaches zero takes the lock before
/// notifying, so a waiter that checked the count under the lock cannot miss it.
#[derive(Debug, Default)]
pub struct InFlight {
    count: AtomicUsize,
    lock: Mutex<()>,
    zero: Condvar,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    pub fn increment(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    pub fn decrement(&self) {
        let prev = self.count.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prev > 0, "in-flight counter underflow");
        if prev == 1 {
            let _guard = self.lock.lock();
            self.zero.notify_all();
        }
    }

    /// Blocks until the count is zero.
    pub fn wait(&self) {
        let mut guard = self.lock.lock();
        while self.count.load(Ordering::Acquire) != 0 {
            self.zero.wait(&mut guard);
        }
    }
}

/// Increments on creation and decrements on drop, however the owner goes away.
#[derive(Debug)]
pub struct InFlightToken {
    counter: Arc<InFlight>,
}

impl InFlightToken {
    pub fn acquire(counter: &Arc<InFlight>) -> Self {
        counter.increment();
        Self {
            counter: Arc::clone(counter),
        }
    }
}

impl Drop for InFlightToken {
    fn drop(&mut self) {
        self.counter.decrement();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_token_balances() {
        let counter = Arc::new(InFlight::new());

        let a = InFlightToken::acquire(&counter);
        let b = InFlightToken::acquire(&counter);
        assert_eq!(counter.get(), 2);

        drop(a);
        assert_eq!(counter.get(), 1);
        drop(b);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_wait_on_zero_returns_immediately() {
        let counter = InFlight::new();
        counter.wait();
    }

    #[test]
    fn test_wait_blocks_until_drained() {
        let counter = Arc::new(InFlight::new());
        let tokens: Vec<_> = (0..8).map(|_| InFlightToken::acquire(&counter)).collect();

        let releaser = thread::spawn(move || {
            for token in tokens {
                thread::sleep(Duration::from_millis(2));
                drop(token);
            }
        });

        counter.wait();
        assert_eq!(counter.get(), 0);
        releaser.join().unwrap();
    }

    #[test]
    fn test_concurrent_updates_not_lost() {
        let counter = Arc::new(InFlight::new());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = counter.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        let token = InFlightToken::acquire(&counter);
                        drop(token);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.get(), 0);
    }
}
