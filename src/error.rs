//! Error types shared by all modules.
//!
//! Every failure a module can hit is fatal at this layer: it is reported to
//! the sink exactly once and the module's loop terminates. Retry or backoff
//! policy is the host's business, layered on top of the source contracts
//! rather than baked in here.

use thiserror::Error;

/// Errors reported by a module to its sink.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The module was built with unusable parameters.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A single poll or read of a data source failed.
    #[error("sample failed: {0}")]
    Sample(String),

    /// The streaming producer ended; no further data will arrive.
    #[error("producer terminated: {0}")]
    Terminated(String),
}

impl Error {
    /// Short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Sample(_) => "sample",
            Error::Terminated(_) => "terminated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = Error::Sample("interface eth9 not found".into());
        assert_eq!(err.to_string(), "sample failed: interface eth9 not found");
        assert_eq!(err.as_label(), "sample");
    }
}
