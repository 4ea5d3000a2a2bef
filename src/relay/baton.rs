use crossbeam_channel::{bounded, Receiver, Sender};

/// Permission to act. Exactly one exists in a running ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baton;

/// One single-slot channel per participant, in ring order.
///
/// Participant `i` receives on `receivers[i]` and forwards on
/// `senders[(i + 1) % n]`.
pub(crate) fn ring(n: usize) -> (Vec<Sender<Baton>>, Vec<Receiver<Baton>>) {
    (0..n).map(|_| bounded(1)).unzip()
}
