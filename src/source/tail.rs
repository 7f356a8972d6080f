//! Subprocess line streamer.
//!
//! Spawns a long-running command with a piped stdout and turns its output
//! into an async sequence of [`TailEvent`]s: one `Line` per line of output,
//! then exactly one `Terminated` once the process ends. A single background
//! reader task feeds the channel, so a line and the terminal event can never
//! race each other.

use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::Error;

/// One event from a streaming producer.
#[derive(Debug)]
pub enum TailEvent {
    /// A line of stdout, without the trailing newline.
    Line(String),
    /// The producer ended. Always the last event.
    Terminated(Error),
}

/// A running subprocess delivering its stdout line by line.
#[derive(Debug)]
pub struct LineStream {
    events: mpsc::Receiver<TailEvent>,
}

impl LineStream {
    /// Launch `command` and start streaming its stdout.
    ///
    /// Failure to spawn is returned synchronously. The child is placed in its
    /// own process group so signals aimed at the host (bar pause/resume and
    /// the like) do not reach it, and it is killed if the stream is dropped
    /// before it exits.
    pub fn start(command: &str, args: &[String]) -> Result<Self, Error> {
        let mut cmd = Command::new(command);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::Config(format!("failed to launch {}: {}", command, e)))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Config(format!("no stdout pipe for {}", command)))?;

        let (tx, events) = mpsc::channel(16);
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if tx.send(TailEvent::Line(line)).await.is_err() {
                            // Consumer gone; the child dies with the stream.
                            return;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        let err = Error::Terminated(format!("read error: {}", e));
                        let _ = tx.send(TailEvent::Terminated(err)).await;
                        return;
                    }
                }
            }
            let err = match child.wait().await {
                Ok(status) => Error::Terminated(format!("process exited: {}", status)),
                Err(e) => Error::Terminated(format!("wait failed: {}", e)),
            };
            debug!(error = %err, "line stream ended");
            let _ = tx.send(TailEvent::Terminated(err)).await;
        });

        Ok(Self { events })
    }

    /// Wait for the next event.
    ///
    /// Cancel-safe. After `Terminated` has been delivered, and in the
    /// unexpected case of the reader task vanishing, a terminal event is
    /// returned rather than hanging the caller.
    pub async fn next_event(&mut self) -> TailEvent {
        match self.events.recv().await {
            Some(event) => event,
            None => TailEvent::Terminated(Error::Terminated("stream closed".into())),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_receiver(events: mpsc::Receiver<TailEvent>) -> Self {
        Self { events }
    }
}
