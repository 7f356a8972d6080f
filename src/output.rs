//! Render results and the host-provided sink boundary.

use std::fmt;

use serde::Serialize;

use crate::error::Error;

/// One rendered block of status bar content.
///
/// The runtime treats outputs as opaque: it produces them by applying the
/// module's current format function and hands them straight to the sink.
/// Serializes as `{"full_text": ...}` so hosts can emit i3bar-style JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Output {
    #[serde(rename = "full_text")]
    text: String,
}

impl Output {
    /// A plain text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The block's text content.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Where a module delivers its results.
///
/// `error` reports a fatal condition; its return value says whether the
/// module loop must stop. Modules here treat every reported error as
/// terminal, so the value is informational for hosts that wrap sinks.
pub trait Sink: Send + Sync {
    /// Display the latest render.
    fn output(&self, output: Output);

    /// Report a fatal condition. Returns `true` when the loop must stop.
    fn error(&self, error: Error) -> bool;
}

/// Format a byte rate with IEC units, e.g. `1.5MiB/s`.
pub fn ibyterate(bytes_per_sec: f64) -> String {
    const UNITS: &[&str] = &["B/s", "KiB/s", "MiB/s", "GiB/s", "TiB/s"];
    let mut rate = bytes_per_sec.max(0.0);
    let mut unit = 0;
    while rate >= 1024.0 && unit < UNITS.len() - 1 {
        rate /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{:.0}{}", rate, UNITS[unit])
    } else {
        format!("{:.1}{}", rate, UNITS[unit])
    }
}
