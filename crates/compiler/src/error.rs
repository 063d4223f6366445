use folio_diagnostics::{Diagnostic, summarize};
use folio_traits::ProcessError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// What became of the compiler's `.log` artifact after a failed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilerLog {
    Read(String),
    Missing,
    Unreadable(String),
}

/// The compiler ran and rejected the document.
#[derive(Error, Debug, Clone)]
#[error("LaTeX compilation failed:\n{}", self.summary())]
pub struct CompilationError {
    /// `None` when the compiler was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub log: CompilerLog,
    /// Classified log entries, at most ten. Empty when the log was missing,
    /// unreadable, or held nothing recognisable.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationError {
    /// Raw log text, when it could be read.
    pub fn log_text(&self) -> Option<&str> {
        match &self.log {
            CompilerLog::Read(text) => Some(text),
            _ => None,
        }
    }

    /// The first `n` diagnostics.
    pub fn top(&self, n: usize) -> &[Diagnostic] {
        &self.diagnostics[..n.min(self.diagnostics.len())]
    }

    /// Human-readable explanation of the failure.
    pub fn summary(&self) -> String {
        match &self.log {
            CompilerLog::Read(_) => summarize(&self.diagnostics),
            CompilerLog::Missing => "LaTeX compilation failed (no log file generated)".to_string(),
            CompilerLog::Unreadable(_) => "LaTeX compilation failed (log file unreadable)".to_string(),
        }
    }
}

/// Errors from a single compiler invocation.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("LaTeX file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error(transparent)]
    Compilation(Box<CompilationError>),

    /// Exit code 0 without a PDF on disk. This points at a mis-invocation of
    /// the compiler, not at a defect in the document.
    #[error("PDF file was not generated despite successful compilation: {}", expected.display())]
    MissingArtifact {
        expected: PathBuf,
        log: Option<String>,
    },

    #[error("Compiling '{}' timed out after {after:?}", source_file.display())]
    Timeout { source_file: PathBuf, after: Duration },

    #[error(transparent)]
    Process(ProcessError),
}
