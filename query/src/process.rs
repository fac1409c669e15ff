//! Running `update-alternatives --query` and parsing its report.
//!
//! The report is parsed while the program is still writing it: stdout is
//! streamed into a [`Parser`] on a worker thread and stderr is collected on
//! another, so neither pipe can fill up and stall the child. The calling
//! thread waits for the exit status, then for the worker results, in short
//! slices and checks the deadline and the [`CancelToken`] between them.
//!
//! A non-zero exit status always wins over whatever the parser produced.

use std::io::{self, BufReader, Read};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use query_alternatives_core::{Alternatives, ParseError, Parser};
use tracing::debug;
use wait_timeout::ChildExt;

use crate::config::QueryConfig;
use crate::error::{QueryError, Result};

/// Longest single wait between cancellation and deadline checks.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

type ParseResult = std::result::Result<Alternatives, ParseError>;

/// Shared flag that aborts a running [`Query`].
///
/// Clones share the flag, so one clone can be moved to another thread and
/// cancelled there.
///
/// # Examples
///
/// ```
/// use query_alternatives::CancelToken;
///
/// let token = CancelToken::new();
/// let remote = token.clone();
/// remote.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. The running query kills its child process.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](Self::cancel) was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Queries group `name` with the default [`QueryConfig`].
///
/// # Examples
///
/// ```no_run
/// let java = query_alternatives::query("java").unwrap();
/// for alt in &java.alternatives {
///     println!("{} (priority {})", alt.path, alt.priority);
/// }
/// ```
pub fn query(name: &str) -> Result<Alternatives> {
    Query::new(name).run()
}

/// A configured query for one alternatives group.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use query_alternatives::{CancelToken, Query, QueryConfig};
///
/// let config = QueryConfig::load("query.yml").unwrap();
/// let token = CancelToken::new();
/// let editor = Query::with_config("editor", &config)
///     .timeout(Duration::from_secs(2))
///     .cancel_token(token.clone())
///     .run()
///     .unwrap();
/// println!("{} -> {}", editor.link, editor.value);
/// ```
#[derive(Debug, Clone)]
pub struct Query {
    name: String,
    config: QueryConfig,
    cancel: Option<CancelToken>,
}

impl Query {
    /// Creates a query for group `name` with the default [`QueryConfig`].
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, &QueryConfig::default())
    }

    /// Creates a query for group `name` using a copy of `config`.
    pub fn with_config(name: impl Into<String>, config: &QueryConfig) -> Self {
        Self {
            name: name.into(),
            config: config.clone(),
            cancel: None,
        }
    }

    /// Overrides the configured time limit.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Waits for the program however long it takes.
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout_ms = None;
        self
    }

    /// Attaches a token that aborts the query when cancelled.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Group name this query asks about.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the program and returns the parsed report.
    ///
    /// # Errors
    ///
    /// - [`QueryError::Spawn`] if the program cannot be started.
    /// - [`QueryError::Failed`] if it exits unsuccessfully.
    /// - [`QueryError::TimedOut`] or [`QueryError::Cancelled`] if it was
    ///   killed before finishing.
    /// - [`QueryError::Parse`] if it succeeded but the report is malformed.
    pub fn run(&self) -> Result<Alternatives> {
        if self.is_cancelled() {
            return Err(self.cancelled());
        }

        let program = &self.config.program;
        let args = self.config.command_args(&self.name);
        debug!(program = %program, args = ?args, "Running alternatives query");

        let deadline = self
            .config
            .timeout_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));

        let mut child = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| QueryError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Each worker reports through a channel; a dropped sender (missing
        // pipe or panicked worker) shows up as a disconnect.
        let (parsed_tx, parsed_rx) = mpsc::channel();
        if let Some(pipe) = child.stdout.take() {
            thread::spawn(move || parse_and_drain(pipe, parsed_tx));
        }
        let (stderr_tx, stderr_rx) = mpsc::channel();
        if let Some(mut pipe) = child.stderr.take() {
            thread::spawn(move || {
                let mut buf = Vec::new();
                if let Err(e) = pipe.read_to_end(&mut buf) {
                    debug!(error = %e, "Failed to read query stderr");
                }
                let _ = stderr_tx.send(buf);
            });
        }

        let status = match self.wait(&mut child, deadline) {
            Ok(status) => status,
            Err(err) => {
                debug!(group = %self.name, error = %err, "Killing alternatives query");
                if let Err(e) = child.kill() {
                    debug!(error = %e, "Failed to kill alternatives query");
                }
                if let Err(e) = child.wait() {
                    debug!(error = %e, "Failed to reap alternatives query");
                }
                // Workers are detached; they end once the pipes close.
                return Err(err);
            }
        };

        if !status.success() {
            debug!(
                group = %self.name,
                exit_code = ?status.code(),
                "Alternatives query exited unsuccessfully"
            );
            let stderr = self.receive(&stderr_rx, deadline)?.unwrap_or_default();
            return Err(QueryError::Failed {
                exit_status: status.code(),
                message: String::from_utf8_lossy(&stderr).trim_end().to_string(),
            });
        }

        match self.receive(&parsed_rx, deadline)? {
            Some(parsed) => Ok(parsed?),
            None => Err(io::Error::other("query stdout was not parsed").into()),
        }
    }

    /// Waits for `child` while honoring the deadline and cancel token.
    fn wait(&self, child: &mut Child, deadline: Option<Instant>) -> Result<ExitStatus> {
        if deadline.is_none() && self.cancel.is_none() {
            return Ok(child.wait()?);
        }
        loop {
            let slice = self.next_slice(deadline)?;
            if let Some(status) = child.wait_timeout(slice)? {
                return Ok(status);
            }
        }
    }

    /// Receives a worker result under the same deadline and cancel token.
    ///
    /// The child may have exited while something it started still holds
    /// the pipe open. Returns `None` when the worker went away without
    /// sending.
    fn receive<T>(&self, rx: &Receiver<T>, deadline: Option<Instant>) -> Result<Option<T>> {
        if deadline.is_none() && self.cancel.is_none() {
            return Ok(rx.recv().ok());
        }
        loop {
            let slice = self.next_slice(deadline).inspect_err(|err| {
                debug!(group = %self.name, error = %err, "Abandoning query output");
            })?;
            match rx.recv_timeout(slice) {
                Ok(value) => return Ok(Some(value)),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Ok(None),
            }
        }
    }

    /// Length of the next wait, or the error ending the query.
    fn next_slice(&self, deadline: Option<Instant>) -> Result<Duration> {
        if self.is_cancelled() {
            return Err(self.cancelled());
        }
        let Some(deadline) = deadline else {
            return Ok(POLL_INTERVAL);
        };
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(QueryError::TimedOut {
                name: self.name.clone(),
                timeout_ms: self.config.timeout_ms.unwrap_or_default(),
            });
        }
        Ok(remaining.min(POLL_INTERVAL))
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    fn cancelled(&self) -> QueryError {
        QueryError::Cancelled {
            name: self.name.clone(),
        }
    }
}

/// Parses the report and sends the result, then drains what is left so the
/// child never blocks writing to a pipe nobody reads.
fn parse_and_drain(pipe: ChildStdout, tx: Sender<ParseResult>) {
    let mut reader = BufReader::new(pipe);
    let result = Parser::new(&mut reader).parse();
    let _ = tx.send(result);
    if let Err(e) = io::copy(&mut reader, &mut io::sink()) {
        debug!(error = %e, "Failed to drain query stdout");
    }
}
