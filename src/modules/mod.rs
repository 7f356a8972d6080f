//! The status bar modules.
//!
//! Each module owns one event loop merging scheduler ticks, format changes,
//! source data, and cancellation, and emits renders to a [`Sink`](crate::Sink)
//! in the order its events arrived.

mod netspeed;
mod tail;

pub use netspeed::{FormatFn, Netspeed, Speeds};
pub use tail::{LineFormatFn, Tail};
