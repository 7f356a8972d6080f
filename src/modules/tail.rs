//! Last-line-of-command module.
//!
//! Runs a long-lived command (`dmesg -w`, `tail -f ...`) and displays the
//! most recent line of its output. A [`refresh`](Tail::refresh) request, or a
//! scheduler tick when a refresh interval is set, re-renders the cached line
//! without new data; useful when the format shows relative time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::Error;
use crate::output::{Output, Sink};
use crate::source::{LineStream, TailEvent};
use crate::timing::Scheduler;
use crate::value::Value;

/// Render function applied to the latest line.
pub type LineFormatFn = Arc<dyn Fn(&str) -> Output + Send + Sync>;

/// A status bar module showing the last line of a command's output.
///
/// Handles are cheap clones sharing the same configuration; format changes,
/// refresh requests, and interval changes all work while the module runs.
#[derive(Clone)]
pub struct Tail {
    command: String,
    args: Vec<String>,
    format: Value<LineFormatFn>,
    refresh: Arc<Notify>,
    scheduler: Scheduler,
    cancel: CancellationToken,
}

impl Tail {
    /// A module tailing `command` with `args`, echoing each line verbatim by
    /// default. No periodic refresh until [`refresh_interval`](Self::refresh_interval)
    /// is called.
    pub fn new<I>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            format: Value::new(Arc::new(|line: &str| Output::text(line)) as LineFormatFn),
            refresh: Arc::new(Notify::new()),
            scheduler: Scheduler::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the render function. Applies from the next data event or
    /// refresh; the swap alone does not re-render.
    pub fn format(&self, format: impl Fn(&str) -> Output + Send + Sync + 'static) -> &Self {
        self.format.set(Arc::new(format));
        self
    }

    /// Re-render the last known line through the current format, even though
    /// no new line has arrived. Coalesces if the loop is busy.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Re-render periodically, as if [`refresh`](Self::refresh) were called
    /// every `interval`.
    pub fn refresh_interval(&self, interval: Duration) -> &Self {
        self.scheduler.every(interval);
        self
    }

    /// Stop the module, without an error report, when `token` is cancelled.
    pub fn cancelled_by(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Launch the command and run the module, delivering renders and at most
    /// one error to `sink`.
    pub async fn run<S: Sink>(&self, sink: &S) {
        if self.command.is_empty() {
            sink.error(Error::Config("tail command is empty".into()));
            return;
        }
        let stream = match LineStream::start(&self.command, &self.args) {
            Ok(stream) => stream,
            Err(e) => {
                sink.error(e);
                return;
            }
        };
        self.run_with(stream, sink).await;
    }

    async fn run_with<S: Sink>(&self, mut events: LineStream, sink: &S) {
        let mut timer = self.scheduler.timer();
        let mut format = self.format.subscribe();
        let mut render = format.latest();
        let mut latest: Option<String> = None;
        debug!(command = %self.command, "tail streaming");

        loop {
            let emit = tokio::select! {
                event = events.next_event() => match event {
                    TailEvent::Line(line) => {
                        latest = Some(line);
                        true
                    }
                    TailEvent::Terminated(e) => {
                        debug!(command = %self.command, error = %e, "tail ended");
                        sink.error(e);
                        return;
                    }
                },
                _ = format.changed() => {
                    render = format.latest();
                    false
                }
                _ = self.refresh.notified() => true,
                _ = timer.tick() => true,
                _ = self.cancel.cancelled() => {
                    debug!(command = %self.command, "tail cancelled");
                    return;
                }
            };
            if emit {
                if let Some(line) = &latest {
                    sink.output(render(line));
                }
            }
        }
    }
}
