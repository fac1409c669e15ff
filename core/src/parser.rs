//! Line-oriented parser for `update-alternatives --query` reports.
//!
//! A report is a sequence of `Key: value` fields. A value continues on the
//! following lines as long as they start with a space, which is how the
//! `Slaves:` lists are written. Blank lines separate blocks and carry no
//! content.
//!
//! The parser starts in the header of the report and switches to alternative
//! blocks at the first `Alternative:` field:
//!
//! ```text
//! Name: editor
//! Link: /usr/bin/editor
//! Status: auto
//! Best: /bin/nano
//! Value: /bin/nano
//!
//! Alternative: /bin/nano
//! Priority: 40
//! ```
//!
//! The primary entry point is [`Parser::new`] followed by [`Parser::parse`];
//! [`parse_str`] and [`parse_reader`] cover the common input sources.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

use tracing::{debug, trace};

use crate::error::{ParseError, Result};
use crate::types::{Alternative, Alternatives};

/// Parses a whole report held in memory.
///
/// # Examples
///
/// ```
/// use query_alternatives_core::parse_str;
///
/// let report = "\
/// Name: editor
/// Link: /usr/bin/editor
/// Slaves:
///  editor.1.gz /usr/share/man/man1/editor.1.gz
/// Status: manual
/// Best: /usr/bin/vim.basic
/// Value: /bin/nano
///
/// Alternative: /bin/nano
/// Priority: 40
///
/// Alternative: /usr/bin/vim.basic
/// Priority: 30
/// ";
///
/// let group = parse_str(report).unwrap();
/// assert_eq!(group.name, "editor");
/// assert!(group.is_manual());
/// assert_eq!(group.alternatives.len(), 2);
/// assert_eq!(group.current().unwrap().priority, 40);
/// ```
pub fn parse_str(input: &str) -> Result<Alternatives> {
    Parser::new(input.as_bytes()).parse()
}

/// Parses a report from an unbuffered reader such as a child's stdout.
pub fn parse_reader<R: Read>(reader: R) -> Result<Alternatives> {
    Parser::new(BufReader::new(reader)).parse()
}

/// Streaming report parser over a buffered reader.
///
/// Holds one line of lookahead to decide whether the next line continues the
/// current value, and counts physical lines for error reporting.
#[derive(Debug)]
pub struct Parser<R> {
    reader: R,
    lookahead: Option<String>,
    line_no: usize,
}

/// Block the parser is currently filling.
enum State {
    Header,
    InAlternative(Alternative),
}

impl<R: BufRead> Parser<R> {
    /// Creates a parser positioned at the start of `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            lookahead: None,
            line_no: 0,
        }
    }

    /// Number of physical lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_no
    }

    /// Reads the whole report.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] met. The stream is left positioned
    /// after the offending line.
    pub fn parse(mut self) -> Result<Alternatives> {
        let mut record = Alternatives::default();
        let mut state = State::Header;

        while let Some((key, value)) = self.read_pair()? {
            trace!(line = self.line_no, key = %key, "Read report field");
            state = match state {
                State::Header => self.apply_header(&mut record, key, value)?,
                State::InAlternative(current) => {
                    self.apply_alternative(&mut record, current, key, value)?
                }
            };
        }

        if let State::InAlternative(current) = state {
            record.alternatives.push(current);
        }

        debug!(
            name = %record.name,
            alternatives = record.alternatives.len(),
            lines = self.line_no,
            "Parsed alternatives report"
        );
        Ok(record)
    }

    fn apply_header(&self, record: &mut Alternatives, key: String, value: String) -> Result<State> {
        match key.as_str() {
            "Name" => record.name = value,
            "Link" => record.link = value,
            "Status" => record.status = value,
            "Best" => record.best = value,
            "Value" => record.value = value,
            "Slaves" => record.slaves = self.parse_slaves(&value)?,
            "Alternative" => {
                trace!(line = self.line_no, path = %value, "Entering alternative block");
                return Ok(State::InAlternative(Alternative::new(value)));
            }
            _ => return Err(self.unexpected_key(key)),
        }
        Ok(State::Header)
    }

    fn apply_alternative(
        &self,
        record: &mut Alternatives,
        mut current: Alternative,
        key: String,
        value: String,
    ) -> Result<State> {
        match key.as_str() {
            "Priority" => {
                current.priority = value
                    .parse()
                    .map_err(|source| ParseError::InvalidPriority {
                        line: self.line_no,
                        source,
                    })?;
            }
            "Slaves" => current.slaves = self.parse_slaves(&value)?,
            "Alternative" => {
                trace!(line = self.line_no, path = %value, "Entering alternative block");
                record.alternatives.push(current);
                current = Alternative::new(value);
            }
            _ => return Err(self.unexpected_key(key)),
        }
        Ok(State::InAlternative(current))
    }

    fn unexpected_key(&self, key: String) -> ParseError {
        ParseError::UnexpectedKey {
            line: self.line_no,
            key,
        }
    }

    /// Splits a joined slaves value into `name path` entries.
    fn parse_slaves(&self, value: &str) -> Result<HashMap<String, String>> {
        if value.is_empty() {
            return Ok(HashMap::new());
        }
        value
            .split('\n')
            .map(|entry| {
                entry
                    .split_once(' ')
                    .map(|(name, path)| (name.to_string(), path.to_string()))
                    .ok_or(ParseError::MalformedSlavesLine { line: self.line_no })
            })
            .collect()
    }

    /// Reads the next `Key: value` pair, folding continuation lines into the
    /// value. Returns `None` at end of input.
    fn read_pair(&mut self) -> Result<Option<(String, String)>> {
        let line = loop {
            match self.next_line()? {
                None => return Ok(None),
                Some(line) if line.is_empty() => continue,
                Some(line) => break line,
            }
        };

        let Some((key, rest)) = line.split_once(':') else {
            return Err(ParseError::MalformedLine { line: self.line_no });
        };
        let mut value = rest.strip_prefix(' ').unwrap_or(rest).to_string();

        while self.continues_value()? {
            let Some(next) = self.next_line()? else {
                break;
            };
            if !value.is_empty() {
                value.push('\n');
            }
            value.push_str(next.trim_start_matches(' '));
        }

        Ok(Some((key.to_string(), value)))
    }

    /// Peeks whether the next line is a continuation line.
    fn continues_value(&mut self) -> Result<bool> {
        if self.lookahead.is_none() {
            self.lookahead = self.read_physical_line()?;
        }
        Ok(self
            .lookahead
            .as_deref()
            .is_some_and(|line| line.starts_with(' ')))
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        let line = match self.lookahead.take() {
            Some(line) => Some(line),
            None => self.read_physical_line()?,
        };
        if line.is_some() {
            self.line_no += 1;
        }
        Ok(line)
    }

    /// Reads one line with its `\n` or `\r\n` terminator removed.
    fn read_physical_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        if self.reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
