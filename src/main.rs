use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use barline::{duration::parse_duration, Error, Netspeed, Output, Sink, Tail};

#[derive(Parser, Debug)]
#[command(name = "barline")]
#[command(about = "Live-updating status bar modules, one JSON block per line on stdout")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show network throughput for an interface
    Netspeed {
        /// Network interface to watch (e.g. eth0, wlan0)
        #[arg(short, long)]
        interface: String,

        /// Refresh interval, also the averaging window (e.g. "3s", "500ms")
        #[arg(short, long, default_value = "3s")]
        refresh: String,
    },
    /// Show the last line of output from a long-running command
    Tail {
        /// Command to run
        command: String,

        /// Arguments passed to the command
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,

        /// Re-render the last line periodically (e.g. "30s"); off by default
        #[arg(short, long)]
        refresh: Option<String>,
    },
}

/// Writes each render as one JSON object per line, i3bar block style.
///
/// Remembers whether a fatal error was reported so the process can exit
/// non-zero after the module loop ends.
#[derive(Default)]
struct NdjsonSink {
    failed: AtomicBool,
}

impl NdjsonSink {
    fn failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }
}

impl Sink for NdjsonSink {
    fn output(&self, output: Output) {
        match serde_json::to_string(&output) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(error = %e, "failed to serialize output"),
        }
    }

    fn error(&self, error: Error) -> bool {
        eprintln!("barline: {error}");
        self.failed.store(true, Ordering::Relaxed);
        true
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Ctrl-C stops the module cleanly, without an error report.
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let sink = NdjsonSink::default();
    match args.command {
        Command::Netspeed { interface, refresh } => {
            let refresh = parse_duration(&refresh)?;
            let module = Netspeed::new(interface).cancelled_by(cancel);
            module.refresh_interval(refresh);
            module.run(&sink).await;
        }
        Command::Tail {
            command,
            args: command_args,
            refresh,
        } => {
            let module = Tail::new(command, command_args).cancelled_by(cancel);
            if let Some(refresh) = refresh {
                module.refresh_interval(parse_duration(&refresh)?);
            }
            module.run(&sink).await;
        }
    }

    Ok(if sink.failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_remembers_a_reported_error() {
        let sink = NdjsonSink::default();
        assert!(!sink.failed());
        assert!(sink.error(Error::Sample("interface eth9 not found".into())));
        assert!(sink.failed());
    }
}
