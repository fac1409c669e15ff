//! Query Debian alternatives groups through `update-alternatives`.
//!
//! This crate runs `update-alternatives --query <name>` and hands its stdout
//! to the report parser from `query-alternatives-core`, whose types are
//! re-exported here.
//!
//! # Main entry points
//!
//! - [`query`] — query a group with the default [`QueryConfig`].
//! - [`Query`] — query with a custom configuration, time limit or
//!   [`CancelToken`].
//! - [`parse_str`] — parse report text captured elsewhere, without running
//!   anything.
//!
//! # Example
//!
//! ```no_run
//! use query_alternatives::{QueryError, query};
//!
//! match query("java") {
//!     Ok(java) => println!("java -> {}", java.value),
//!     Err(QueryError::Failed { message, .. }) => eprintln!("no java: {message}"),
//!     Err(e) => eprintln!("query failed: {e}"),
//! }
//! ```
//!
//! # Errors
//!
//! A program that exits unsuccessfully is reported as
//! [`QueryError::Failed`] with its stderr, even if part of a report was
//! already parsed. Timeouts and cancellation kill the program and surface as
//! [`QueryError::TimedOut`] and [`QueryError::Cancelled`].

mod config;
mod error;
mod process;

pub use config::{DEFAULT_PROGRAM, DEFAULT_TIMEOUT_MS, QueryConfig};
pub use error::{QueryError, Result};
pub use process::{CancelToken, Query, query};
pub use query_alternatives_core::{
    Alternative, Alternatives, ParseError, Parser, STATUS_AUTO, STATUS_MANUAL, parse_reader,
    parse_str,
};
