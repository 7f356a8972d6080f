//! # barline
//!
//! Live-updating status bar modules built on a small reactive runtime.
//!
//! A module turns intermittent external events — timer ticks, runtime
//! reconfiguration, data arriving from outside — into an ordered stream of
//! rendered outputs, without races and without buffering missed updates.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Module event loop                        │
//! │                                                              │
//! │  timing::Timer ──tick──────────┐                             │
//! │  value::Subscription ──change──┤                             │
//! │  source (poll / stream) ──data─┼──▶ select! ──▶ render ──▶ Sink
//! │  CancellationToken ──cancel────┘         │                   │
//! │                                          ▼                   │
//! │                           current format fn (value::Value)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`value`]**: a concurrently-writable single-value holder with
//!   exactly-once-per-change notification; holds each module's swappable
//!   render function.
//! - **[`timing`]**: drift-free periodic wake-ups with a live-reconfigurable
//!   interval; missed ticks are dropped, never queued.
//! - **[`source`]**: the data boundary — polling counters
//!   ([`NetDev`]) and streaming subprocess output ([`source::LineStream`]).
//! - **[`modules`]**: the event loops themselves — [`Netspeed`] (polling)
//!   and [`Tail`] (streaming).
//! - **[`output`]**: the opaque render result and the host's [`Sink`]
//!   boundary.
//!
//! ## Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use barline::{Netspeed, Output, Sink, Error};
//!
//! struct Stdout;
//! impl Sink for Stdout {
//!     fn output(&self, output: Output) { println!("{output}"); }
//!     fn error(&self, error: Error) -> bool { eprintln!("{error}"); true }
//! }
//!
//! # async fn demo() {
//! let netspeed = Netspeed::new("wlan0");
//! netspeed.refresh_interval(Duration::from_secs(1));
//! netspeed.format(|speeds| Output::text(format!("{:.0} B/s", speeds.total())));
//! netspeed.run(&Stdout).await;
//! # }
//! ```
//!
//! Every fatal condition (bad configuration, a failed poll, a terminated
//! producer) is reported to the sink exactly once and ends the module's
//! loop; the last rendered output stays on screen.

pub mod duration;
pub mod error;
pub mod modules;
pub mod output;
pub mod source;
pub mod timing;
pub mod value;

pub use error::Error;
pub use modules::{FormatFn, LineFormatFn, Netspeed, Speeds, Tail};
pub use output::{ibyterate, Output, Sink};
pub use source::{Counters, NetDev, Sample};
pub use timing::{Scheduler, Timer};
pub use value::{Subscription, Value};
