//! Ordered relay scheduler.
//!
//! A ring of participants where each one waits for a baton on its own
//! single-slot channel, acts once, and hands the baton on. With N
//! participants and R rounds the observed action sequence is always the
//! participant order repeated R times.
//!
//! ```no_run
//! use handoff::relay::RelayScheduler;
//!
//! let relay = RelayScheduler::builder()
//!     .rounds(100)
//!     .participant("cat", || println!("cat"))
//!     .participant("dog", || println!("dog"))
//!     .participant("fish", || println!("fish"))
//!     .build()
//!     .unwrap();
//!
//! let report = relay.run().unwrap();
//! assert_eq!(report.total_actions(), 300);
//! ```

pub mod baton;
pub mod participant;
pub mod scheduler;

pub use baton::Baton;
pub use participant::{Outcome, ParticipantReport};
pub use scheduler::{RelayBuilder, RelayReport, RelayScheduler};
