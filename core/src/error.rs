//! Error types for report parsing.

use std::io;
use std::num::ParseIntError;

use thiserror::Error;

/// Errors that abort a parse. No partial record accompanies any of them.
///
/// Line numbers are 1-based and count every physical line consumed,
/// including blank and continuation lines.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A key line has no `:` separator.
    #[error("error parsing alternatives: {line}: malformed line")]
    MalformedLine { line: usize },

    /// A key that is unknown or not valid in the current block.
    #[error("error parsing alternatives: {line}: unexpected key: {key}")]
    UnexpectedKey { line: usize, key: String },

    /// A slave entry without a space between name and path.
    #[error("error parsing alternatives: {line}: malformed slaves line")]
    MalformedSlavesLine { line: usize },

    /// A `Priority` value that is not a base-10 integer.
    #[error("error parsing alternatives: {line}: invalid priority value")]
    InvalidPriority {
        line: usize,
        #[source]
        source: ParseIntError,
    },

    /// The input stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// Returns the line the error was detected on, if it is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::MalformedLine { line }
            | Self::UnexpectedKey { line, .. }
            | Self::MalformedSlavesLine { line }
            | Self::InvalidPriority { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;
