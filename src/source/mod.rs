//! Data sources feeding the module event loops.
//!
//! Two flavors exist. Polling sources ([`Counters`]) hand back a fresh
//! cumulative [`Sample`] on demand; the module turns pairs of samples into
//! rates. Streaming sources ([`tail::LineStream`]) push discrete line events
//! from a subprocess until a single terminal event. Either kind fails
//! terminally: a source error ends the module's loop, and any retry policy
//! belongs to the host.

mod netdev;
pub mod tail;

pub use netdev::NetDev;
pub use tail::{LineStream, TailEvent};

use tokio::time::Instant;

use crate::error::Error;

/// Cumulative traffic counters observed at one point in time.
///
/// `taken_at` is monotonic so elapsed time between samples is immune to
/// wall-clock jumps (and controllable from tests via tokio's paused clock).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Total bytes received since the counter started.
    pub rx_bytes: u64,
    /// Total bytes sent since the counter started.
    pub tx_bytes: u64,
    /// When the counters were read.
    pub taken_at: Instant,
}

/// A polling source of cumulative counters.
///
/// Each call is independent; there is no session state to tear down. An `Err`
/// is terminal for the calling loop.
pub trait Counters: Send {
    /// Read the counters right now.
    fn sample(&mut self) -> Result<Sample, Error>;
}
