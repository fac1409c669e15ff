//! Parser and record types for `update-alternatives --query` reports.
//!
//! Debian-family systems manage interchangeable providers of a command
//! (`java`, `editor`, `x-terminal-emulator`, ...) as alternatives groups. The
//! `update-alternatives --query <name>` report describes one group:
//!
//! - [`Alternatives`] — the group: generic link, slave links, selection
//!   status, best and current value, and every registered alternative.
//! - [`Alternative`] — one registered provider with its priority and slave
//!   paths.
//!
//! [`parse_str`], [`parse_reader`] and [`Parser`] turn report text into these
//! types, failing with a line-tagged [`ParseError`] on malformed input. This
//! crate never runs the tool itself; the `query-alternatives` crate does.
//!
//! # Example
//!
//! ```
//! use query_alternatives_core::parse_str;
//!
//! let report = "\
//! Name: java
//! Link: /usr/bin/java
//! Status: auto
//! Best: /usr/lib/jvm/java-21-openjdk-amd64/bin/java
//! Value: /usr/lib/jvm/java-21-openjdk-amd64/bin/java
//!
//! Alternative: /usr/lib/jvm/java-21-openjdk-amd64/bin/java
//! Priority: 2111
//! Slaves:
//!  java.1.gz /usr/lib/jvm/java-21-openjdk-amd64/man/man1/java.1.gz
//! ";
//!
//! let group = parse_str(report).unwrap();
//! assert_eq!(group.link, "/usr/bin/java");
//! let current = group.current().unwrap();
//! assert_eq!(current.priority, 2111);
//! assert!(current.slaves.contains_key("java.1.gz"));
//! ```

mod error;
mod parser;
mod types;

pub use error::{ParseError, Result};
pub use parser::{Parser, parse_reader, parse_str};
pub use types::*;
