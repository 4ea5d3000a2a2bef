use super::baton::{ring, Baton};
use super::participant::{Action, Outcome, Participant, ParticipantReport};
use crate::config::RelayConfig;
use crate::error::{Error, Result};
use crate::executor::PanicInfo;
use crate::util::StopSignal;
use std::thread::{self, JoinHandle};

/// Runs a fixed ring of participants in strict round-robin order.
///
/// Each participant owns a single-slot baton channel and may only act while
/// holding the baton; acting hands it to the next participant. Ordering comes
/// from the ring topology alone.
pub struct RelayScheduler {
    config: RelayConfig,
    roles: Vec<Role>,
    stop: StopSignal,
}

struct Role {
    name: String,
    action: Action,
}

/// Summary returned by [`RelayScheduler::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReport {
    pub participants: Vec<ParticipantReport>,
}

impl RelayReport {
    pub fn total_actions(&self) -> usize {
        self.participants.iter().map(|p| p.rounds_completed).sum()
    }

    /// True if any participant left before finishing its rounds.
    pub fn aborted(&self) -> bool {
        self.participants
            .iter()
            .any(|p| p.outcome != Outcome::Completed)
    }
}

impl RelayScheduler {
    pub fn builder() -> RelayBuilder {
        RelayBuilder::new()
    }

    /// Handle that aborts the whole ring when fired.
    ///
    /// A participant interrupted this way does not forward its baton, so this
    /// is only meant for stopping every participant at once.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn num_participants(&self) -> usize {
        self.roles.len()
    }

    pub fn rounds(&self) -> usize {
        self.config.rounds
    }

    /// Spawns every participant, hands the first baton to participant 0 and
    /// blocks until all of them are done.
    pub fn run(self) -> Result<RelayReport> {
        let RelayScheduler {
            config,
            roles,
            stop,
        } = self;
        let n = roles.len();

        if config.rounds == 0 {
            let participants = roles
                .into_iter()
                .map(|role| ParticipantReport {
                    name: role.name,
                    rounds_completed: 0,
                    outcome: Outcome::Completed,
                })
                .collect();
            return Ok(RelayReport { participants });
        }

        let (senders, receivers) = ring(n);
        let starter = senders[0].clone();
        let mut handles: Vec<(String, JoinHandle<ParticipantReport>)> = Vec::with_capacity(n);

        for (index, (role, inbox)) in roles.into_iter().zip(receivers).enumerate() {
            let participant = Participant {
                name: role.name.clone(),
                inbox,
                next: senders[(index + 1) % n].clone(),
                stop: stop.clone(),
                action: role.action,
                rounds: config.rounds,
                is_last: index + 1 == n,
            };

            let spawned = thread::Builder::new()
                .name(format!("{}-{}", config.thread_name_prefix, index))
                .spawn(move || participant.run());

            match spawned {
                Ok(handle) => handles.push((role.name, handle)),
                Err(e) => {
                    tracing::error!(participant = %role.name, error = %e, "spawn failed");
                    stop.fire();
                    for (_, handle) in handles {
                        let _ = handle.join();
                    }
                    return Err(Error::Spawn(e));
                }
            }
        }
        drop(senders);

        tracing::debug!(participants = n, rounds = config.rounds, "relay started");
        // the slot is empty, so this never blocks
        let _ = starter.send(Baton);
        drop(starter);

        let mut participants = Vec::with_capacity(n);
        let mut failure = None;

        for (name, handle) in handles {
            let report = match handle.join() {
                Ok(report) => report,
                Err(payload) => {
                    let info = PanicInfo::from_payload(payload);
                    ParticipantReport {
                        name,
                        rounds_completed: 0,
                        outcome: Outcome::Panicked(info.message),
                    }
                }
            };

            if let Outcome::Panicked(message) = &report.outcome {
                failure.get_or_insert_with(|| Error::participant_panic(&report.name, message));
            }
            participants.push(report);
        }

        if let Some(err) = failure {
            return Err(err);
        }

        let report = RelayReport { participants };
        if report.aborted() {
            tracing::warn!(actions = report.total_actions(), "relay aborted");
        } else {
            tracing::debug!(actions = report.total_actions(), "relay finished");
        }
        Ok(report)
    }
}

impl std::fmt::Debug for RelayScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.roles.iter().map(|r| &r.name).collect();
        f.debug_struct("RelayScheduler")
            .field("participants", &names)
            .field("rounds", &self.config.rounds)
            .finish()
    }
}

#[derive(Default)]
pub struct RelayBuilder {
    config: RelayConfig,
    roles: Vec<Role>,
    stop: Option<StopSignal>,
}

impl RelayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rounds(mut self, rounds: usize) -> Self {
        self.config.rounds = rounds;
        self
    }

    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// Uses `signal` as the ring's stop signal instead of a fresh one, so
    /// actions can capture it before the ring is built.
    pub fn stop_signal(mut self, signal: StopSignal) -> Self {
        self.stop = Some(signal);
        self
    }

    /// Appends a participant. Participants act in the order they are added.
    pub fn participant<S, F>(mut self, name: S, action: F) -> Self
    where
        S: Into<String>,
        F: FnMut() + Send + 'static,
    {
        self.roles.push(Role {
            name: name.into(),
            action: Box::new(action),
        });
        self
    }

    pub fn build(self) -> Result<RelayScheduler> {
        if self.roles.is_empty() {
            return Err(Error::config("relay needs at least 1 participant"));
        }

        Ok(RelayScheduler {
            config: self.config,
            roles: self.roles,
            stop: self.stop.unwrap_or_default(),
        })
    }
}

impl std::fmt::Debug for RelayBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayBuilder")
            .field("config", &self.config)
            .field("participants", &self.roles.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    type Log = Arc<Mutex<Vec<&'static str>>>;

    fn recording_relay(names: &[&'static str], rounds: usize) -> (RelayScheduler, Log) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut builder = RelayScheduler::builder().rounds(rounds);
        for &name in names {
            let log = log.clone();
            builder = builder.participant(name, move || log.lock().push(name));
        }
        (builder.build().unwrap(), log)
    }

    #[test]
    fn test_no_participants_rejected() {
        let result = RelayScheduler::builder().rounds(3).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_three_roles_in_order() {
        let (relay, log) = recording_relay(&["a", "b", "c"], 10);
        let report = relay.run().unwrap();

        assert_eq!(report.total_actions(), 30);
        assert!(!report.aborted());

        let log = log.lock();
        for (i, name) in log.iter().enumerate() {
            assert_eq!(*name, ["a", "b", "c"][i % 3]);
        }
    }

    #[test]
    fn test_zero_rounds_is_noop() {
        let (relay, log) = recording_relay(&["a", "b"], 0);
        let report = relay.run().unwrap();

        assert_eq!(report.total_actions(), 0);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_single_participant() {
        let (relay, log) = recording_relay(&["solo"], 4);
        relay.run().unwrap();
        assert_eq!(*log.lock(), vec!["solo"; 4]);
    }

    #[test]
    fn test_stop_before_run() {
        let (relay, log) = recording_relay(&["a", "b", "c"], 5);
        relay.stop_signal().fire();

        let report = relay.run().unwrap();
        assert!(report.aborted());
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_panicking_action_aborts_ring() {
        let mut calls = 0;
        let relay = RelayScheduler::builder()
            .rounds(10)
            .participant("a", || {})
            .participant("b", move || {
                calls += 1;
                if calls == 3 {
                    panic!("b gave up");
                }
            })
            .participant("c", || {})
            .build()
            .unwrap();

        match relay.run() {
            Err(Error::ParticipantPanic { name, message }) => {
                assert_eq!(name, "b");
                assert_eq!(message, "b gave up");
            }
            other => panic!("expected participant panic, got {:?}", other),
        }
    }
}
