//! Network interface counters read from `/proc/net/dev`.

use std::fs;
use std::path::PathBuf;

use tokio::time::Instant;

use super::{Counters, Sample};
use crate::error::Error;

const PROC_NET_DEV: &str = "/proc/net/dev";

/// Cumulative rx/tx byte counters for one network interface.
#[derive(Debug, Clone)]
pub struct NetDev {
    interface: String,
    path: PathBuf,
}

impl NetDev {
    /// Counters for `interface`, e.g. `"eth0"` or `"wlan0"`.
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            path: PathBuf::from(PROC_NET_DEV),
        }
    }
}

impl Counters for NetDev {
    fn sample(&mut self) -> Result<Sample, Error> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| Error::Sample(format!("read {}: {}", self.path.display(), e)))?;
        let (rx_bytes, tx_bytes) = parse(&content, &self.interface).ok_or_else(|| {
            Error::Sample(format!(
                "interface {} not found in {}",
                self.interface,
                self.path.display()
            ))
        })?;
        Ok(Sample {
            rx_bytes,
            tx_bytes,
            taken_at: Instant::now(),
        })
    }
}

/// Extract `(rx_bytes, tx_bytes)` for `interface` from `/proc/net/dev` text.
///
/// Layout per line after the two header lines:
/// `iface: rx_bytes rx_packets errs drop fifo frame compressed multicast tx_bytes ...`
fn parse(content: &str, interface: &str) -> Option<(u64, u64)> {
    for line in content.lines().skip(2) {
        let Some((name, counters)) = line.split_once(':') else {
            continue;
        };
        if name.trim() != interface {
            continue;
        }
        let mut fields = counters.split_whitespace();
        let rx_bytes = fields.next()?.parse().ok()?;
        let tx_bytes = fields.nth(7)?.parse().ok()?;
        return Some((rx_bytes, tx_bytes));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXTURE: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 1839690   12730    0    0    0     0          0         0  1839690   12730    0    0    0     0       0          0
  eth0: 5000123     430    0    0    0     0          0         0  1200456     390    0    0    0     0       0          0
";

    fn fixture_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", FIXTURE).unwrap();
        file
    }

    #[test]
    fn parses_counters_for_named_interface() {
        assert_eq!(parse(FIXTURE, "eth0"), Some((5000123, 1200456)));
        assert_eq!(parse(FIXTURE, "lo"), Some((1839690, 1839690)));
    }

    #[test]
    fn unknown_interface_is_none() {
        assert_eq!(parse(FIXTURE, "wlan0"), None);
    }

    #[test]
    fn sample_reads_the_backing_file() {
        let file = fixture_file();
        let mut counters = NetDev {
            interface: "eth0".into(),
            path: file.path().into(),
        };
        let sample = counters.sample().unwrap();
        assert_eq!(sample.rx_bytes, 5000123);
        assert_eq!(sample.tx_bytes, 1200456);
    }

    #[test]
    fn missing_file_is_a_sample_error() {
        let mut counters = NetDev {
            interface: "eth0".into(),
            path: "/nonexistent/net/dev".into(),
        };
        let err = counters.sample().unwrap_err();
        assert!(err.to_string().contains("read"));
        assert_eq!(err.as_label(), "sample");
    }

    #[test]
    fn missing_interface_is_a_sample_error() {
        let file = fixture_file();
        let mut counters = NetDev {
            interface: "wlan0".into(),
            path: file.path().into(),
        };
        let err = counters.sample().unwrap_err();
        assert!(err.to_string().contains("wlan0"));
    }
}
