//! Error types for running an alternatives query.
//!
//! Covers configuration I/O, process lifecycle failures and the parse errors
//! of the report itself.

use std::io;

use query_alternatives_core::ParseError;
use thiserror::Error;

/// Errors that can occur while querying an alternatives group.
#[derive(Debug, Error)]
pub enum QueryError {
    /// File or pipe I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The query program could not be started.
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The query program exited unsuccessfully.
    ///
    /// `exit_status` is `None` when the process was ended by a signal.
    /// `message` holds whatever the program wrote to stderr.
    #[error("error querying alternatives: {message}")]
    Failed {
        exit_status: Option<i32>,
        message: String,
    },

    /// The query program did not finish within the configured timeout.
    #[error("query for `{name}` timed out after {timeout_ms} ms")]
    TimedOut { name: String, timeout_ms: u64 },

    /// The query was cancelled through its [`CancelToken`](crate::CancelToken).
    #[error("query for `{name}` was cancelled")]
    Cancelled { name: String },

    /// The program succeeded but its report could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Convenience alias for results with [`QueryError`].
pub type Result<T> = std::result::Result<T, QueryError>;
