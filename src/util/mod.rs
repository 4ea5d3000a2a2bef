pub mod inflight;
pub mod signal;

pub use inflight::{InFlight, InFlightToken};
pub use signal::StopSignal;
