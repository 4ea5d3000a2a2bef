use super::baton::Baton;
use crate::executor::PanicInfo;
use crate::util::StopSignal;
use crossbeam_channel::{select, Receiver, Sender};
use std::panic::{catch_unwind, AssertUnwindSafe};

pub(crate) type Action = Box<dyn FnMut() + Send + 'static>;

/// How a participant left its loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Stopped,
    Panicked(String),
}

/// Result of one participant's run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantReport {
    pub name: String,
    pub rounds_completed: usize,
    pub outcome: Outcome,
}

pub(crate) struct Participant {
    pub name: String,
    pub inbox: Receiver<Baton>,
    pub next: Sender<Baton>,
    pub stop: StopSignal,
    pub action: Action,
    pub rounds: usize,
    // last participant of the ring keeps the baton after the final round
    pub is_last: bool,
}

impl Participant {
    pub fn run(mut self) -> ParticipantReport {
        tracing::debug!(participant = %self.name, rounds = self.rounds, "participant started");

        for round in 0..self.rounds {
            if self.stop.is_fired() {
                return self.report(round, Outcome::Stopped);
            }

            select! {
                recv(self.inbox) -> baton => {
                    if baton.is_err() {
                        return self.report(round, Outcome::Stopped);
                    }
                }
                recv(self.stop.receiver()) -> _ => {
                    return self.report(round, Outcome::Stopped);
                }
            }

            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| (self.action)())) {
                let info = PanicInfo::from_payload(payload);
                tracing::error!(
                    participant = %self.name,
                    round,
                    message = %info.message,
                    "action panicked, aborting relay"
                );
                // nobody downstream will ever get the baton
                self.stop.fire();
                return self.report(round, Outcome::Panicked(info.message));
            }

            let final_hand = self.is_last && round + 1 == self.rounds;
            if !final_hand && self.next.send(Baton).is_err() {
                return self.report(round + 1, Outcome::Stopped);
            }
        }

        self.report(self.rounds, Outcome::Completed)
    }

    fn report(&self, rounds_completed: usize, outcome: Outcome) -> ParticipantReport {
        if outcome == Outcome::Stopped {
            tracing::debug!(participant = %self.name, rounds_completed, "participant stopped early");
        } else {
            tracing::debug!(participant = %self.name, rounds_completed, "participant finished");
        }

        ParticipantReport {
            name: self.name.clone(),
            rounds_completed,
            outcome,
        }
    }
}

impl std::fmt::Debug for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Participant")
            .field("name", &self.name)
            .field("rounds", &self.rounds)
            .field("is_last", &self.is_last)
            .finish_non_exhaustive()
    }
}
