//! ProcessRunner trait for abstracting child-process execution.
//!
//! A compiler invocation is modelled as a plain value: the command, its
//! arguments, the working directory and an optional deadline go in, the exit
//! code and both captured streams come out. Nothing is streamed to the
//! caller's terminal.

use std::ffi::OsString;
use std::fmt::Debug;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Error type for process execution.
///
/// A process that ran and exited non-zero is *not* an error at this level;
/// that is reported through [`ProcessOutput::exit_code`].
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' did not finish within {after:?} and was killed")]
    TimedOut { program: String, after: Duration },

    #[error("I/O error while waiting for '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// A fully described child-process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Directory the child runs in. `None` inherits the caller's directory.
    pub current_dir: Option<PathBuf>,
    /// Upper bound on wall-clock time. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ProcessRequest {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Lossy program name for logs and error messages.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

/// Captured result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, or `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a [`ProcessRequest`] to completion.
///
/// # Implementations
///
/// - `TokioProcessRunner` (folio-executor): spawns a real child process
/// - test fakes: emulate the compiler by writing files and returning canned output
pub trait ProcessRunner: Send + Sync + Debug {
    /// Run the request and capture its output.
    ///
    /// Implementations must honour [`ProcessRequest::timeout`] by terminating
    /// the child and returning [`ProcessError::TimedOut`].
    fn run(
        &self,
        request: ProcessRequest,
    ) -> impl Future<Output = Result<ProcessOutput, ProcessError>> + Send;

    /// Returns a human-readable name for this runner (for logging/debugging).
    fn name(&self) -> &'static str;
}
