//! Network throughput module.
//!
//! Polls cumulative interface counters on a schedule and renders the average
//! rate over each interval. Since there is no instantaneous network speed,
//! the refresh interval is also the averaging window.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::Error;
use crate::output::{ibyterate, Output, Sink};
use crate::source::{Counters, NetDev, Sample};
use crate::timing::Scheduler;
use crate::value::Value;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);

/// Render function applied to each computed [`Speeds`].
pub type FormatFn = Arc<dyn Fn(Speeds) -> Output + Send + Sync>;

/// Bidirectional traffic rates in bytes per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speeds {
    /// Download rate.
    pub rx: f64,
    /// Upload rate.
    pub tx: f64,
}

impl Speeds {
    /// Combined up + down rate.
    pub fn total(&self) -> f64 {
        self.rx + self.tx
    }

    /// Average rates between two successive samples.
    ///
    /// A counter reset (current below previous, e.g. after an interface
    /// bounce) reads as zero rather than a huge negative rate.
    fn between(previous: &Sample, current: &Sample) -> Self {
        let elapsed = current.taken_at.duration_since(previous.taken_at).as_secs_f64();
        if elapsed <= 0.0 {
            return Self { rx: 0.0, tx: 0.0 };
        }
        Self {
            rx: current.rx_bytes.saturating_sub(previous.rx_bytes) as f64 / elapsed,
            tx: current.tx_bytes.saturating_sub(previous.tx_bytes) as f64 / elapsed,
        }
    }
}

/// A status bar module showing network utilisation for one interface.
///
/// Handles are cheap clones sharing the same configuration, so the refresh
/// interval and format can be changed while the module is running:
///
/// ```no_run
/// use barline::{Netspeed, Output};
///
/// let netspeed = Netspeed::new("wlan0");
/// netspeed.format(|speeds| Output::text(format!("{:.0} B/s", speeds.total())));
/// ```
#[derive(Clone)]
pub struct Netspeed {
    interface: String,
    scheduler: Scheduler,
    format: Value<FormatFn>,
    cancel: CancellationToken,
}

impl Netspeed {
    /// A module for `interface`, refreshing every 3 seconds with a
    /// `"<tx> up | <rx> down"` default format.
    pub fn new(interface: impl Into<String>) -> Self {
        let module = Self {
            interface: interface.into(),
            scheduler: Scheduler::new(),
            format: Value::new(Arc::new(default_format) as FormatFn),
            cancel: CancellationToken::new(),
        };
        module.scheduler.every(DEFAULT_INTERVAL);
        module
    }

    /// Replace the render function. Applies from the next tick; an update
    /// mid-interval does not force an immediate re-render.
    pub fn format(&self, format: impl Fn(Speeds) -> Output + Send + Sync + 'static) -> &Self {
        self.format.set(Arc::new(format));
        self
    }

    /// Change the polling (and averaging) interval.
    pub fn refresh_interval(&self, interval: Duration) -> &Self {
        self.scheduler.every(interval);
        self
    }

    /// Stop the module, without an error report, when `token` is cancelled.
    pub fn cancelled_by(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Run the module against the system's `/proc/net/dev` counters,
    /// delivering renders and at most one error to `sink`.
    pub async fn run<S: Sink>(&self, sink: &S) {
        if self.interface.is_empty() {
            sink.error(Error::Config("network interface name is empty".into()));
            return;
        }
        self.run_with(NetDev::new(self.interface.as_str()), sink).await;
    }

    /// Run against an arbitrary counter source.
    pub async fn run_with<C: Counters, S: Sink>(&self, mut counters: C, sink: &S) {
        // Baseline sample; a rate needs two points.
        let mut previous = match counters.sample() {
            Ok(sample) => sample,
            Err(e) => {
                sink.error(e);
                return;
            }
        };

        let mut timer = self.scheduler.timer();
        let mut format = self.format.subscribe();
        let mut render = format.latest();
        let mut speeds: Option<Speeds> = None;
        debug!(interface = %self.interface, "netspeed streaming");

        loop {
            let emit = tokio::select! {
                _ = timer.tick() => match counters.sample() {
                    Ok(current) => {
                        speeds = Some(Speeds::between(&previous, &current));
                        previous = current;
                        true
                    }
                    Err(e) => {
                        debug!(interface = %self.interface, error = %e, "netspeed failed");
                        sink.error(e);
                        return;
                    }
                },
                _ = format.changed() => {
                    render = format.latest();
                    false
                }
                _ = self.cancel.cancelled() => {
                    debug!(interface = %self.interface, "netspeed cancelled");
                    return;
                }
            };
            if emit {
                if let Some(speeds) = speeds {
                    sink.output(render(speeds));
                }
            }
        }
    }
}

fn default_format(speeds: Speeds) -> Output {
    Output::text(format!(
        "{} up | {} down",
        ibyterate(speeds.tx),
        ibyterate(speeds.rx)
    ))
}
