//! Relay error taxonomy.
//!
//! Three caller-visible classes: missing configuration, failed dependency
//! (memory or completion provider), and unexpected internal faults, plus the
//! request time limit. Every variant maps to HTTP 500 at the server edge;
//! the message is the machine-readable part.

use std::fmt;
use thiserror::Error;

/// Which external dependency a [`RelayError::Dependency`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Memory,
    Completion,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Memory => write!(f, "memory"),
            Stage::Completion => write!(f, "completion"),
        }
    }
}

/// Error surfaced by [`ChatRelay::handle`](crate::ChatRelay::handle) and the
/// resulting stream.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A required setting is absent. Raised before any provider is contacted.
    #[error("Missing {setting}")]
    Config { setting: &'static str },

    /// The memory or completion provider failed.
    #[error("{stage} provider failure: {cause}")]
    Dependency { stage: Stage, cause: anyhow::Error },

    /// The request exceeded the configured maximum duration.
    #[error("chat request exceeded the {seconds}s time limit")]
    Timeout { seconds: u64 },

    /// Unexpected fault not attributable to configuration or a dependency.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_the_missing_setting() {
        let err = RelayError::Config {
            setting: "STATIC_USER_ID",
        };
        assert_eq!(err.to_string(), "Missing STATIC_USER_ID");
    }

    #[test]
    fn dependency_error_names_the_stage() {
        let err = RelayError::Dependency {
            stage: Stage::Memory,
            cause: anyhow::anyhow!("connection refused"),
        };
        assert_eq!(
            err.to_string(),
            "memory provider failure: connection refused"
        );
    }
}
