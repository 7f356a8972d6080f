//! Human-friendly duration strings for CLI flags.

use std::time::Duration;

use crate::error::Error;

/// Suffix to nanoseconds multiplier (order matters: longer suffixes first)
const UNITS: &[(&str, f64)] = &[
    ("ns", 1.0),
    ("µs", 1_000.0),
    ("us", 1_000.0),
    ("ms", 1_000_000.0),
    ("s", 1_000_000_000.0),
    ("m", 60_000_000_000.0),
    ("h", 3_600_000_000_000.0),
];

/// Parse duration strings like "3s", "500ms", "1.5m".
///
/// The result is always positive: zero and negative durations are rejected
/// as configuration errors, since every use of a duration here is a
/// scheduler period.
pub fn parse_duration(s: &str) -> Result<Duration, Error> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str
                .parse()
                .map_err(|_| Error::Config(format!("invalid duration: {}", s)))?;
            if val.is_nan() || val <= 0.0 {
                return Err(Error::Config(format!("duration must be positive: {}", s)));
            }
            let duration = Duration::from_nanos((val * multiplier) as u64);
            if duration.is_zero() {
                return Err(Error::Config(format!("duration must be positive: {}", s)));
            }
            return Ok(duration);
        }
    }

    Err(Error::Config(format!("unknown duration format: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_seconds() {
        assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
        let d = parse_duration("1.5s").unwrap();
        assert_eq!(d.as_millis(), 1500);
    }

    #[test]
    fn parses_milliseconds() {
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn parses_minutes_and_hours() {
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1.5m").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn rejects_bare_numbers() {
        assert!(parse_duration("3").is_err());
        assert!(parse_duration("fast").is_err());
    }

    #[test]
    fn rejects_non_positive_durations() {
        // A parsed period feeds Scheduler::every, which requires non-zero;
        // these must surface as config errors, never a panic downstream.
        for input in ["0s", "-3s", "0ms", "-0.5m"] {
            let err = parse_duration(input).unwrap_err();
            assert_eq!(err.as_label(), "config", "input: {}", input);
            assert!(err.to_string().contains("positive"), "input: {}", input);
        }
    }
}
