//! Error taxonomy for the configuration layer
//!
//! Configuration errors are user-input errors: they propagate to the CLI
//! driver unrecovered, and the process aborts before any solver work starts.

use std::path::PathBuf;
use thiserror::Error;

/// An error produced while building or querying a run configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An input token does not match any value of its enumerated domain
    #[error("unrecognized token '{token}' for {field} (position {position})")]
    Format {
        field: &'static str,
        token: String,
        position: usize,
    },

    /// A path-bearing setting refers to an unusable location
    #[error("{field}: path '{}' is not usable: {reason}", path.display())]
    Resource {
        field: &'static str,
        path: PathBuf,
        reason: String,
    },

    /// An operation was invoked in an order that violates the lifecycle
    #[error("{0}")]
    State(String),

    /// Malformed invocation of a construction entry point
    #[error("{0}")]
    Argument(String),
}

impl ConfigError {
    pub(crate) fn format(field: &'static str, token: &str, position: usize) -> Self {
        Self::Format {
            field,
            token: token.to_string(),
            position,
        }
    }

    pub(crate) fn resource(
        field: &'static str,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Resource {
            field,
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        Self::Argument(msg.into())
    }
}
