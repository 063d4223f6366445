// src/error.rs
use folio_compiler::{CompilationError, CompileError, Diagnostic};
use folio_pdf_composer::ComposerError;
use folio_template::TemplateError;
use folio_traits::{ProcessError, StoreError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// A comprehensive error type for the document assembly pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A template, attachment or merge source does not exist.
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The compiler ran and rejected the document.
    #[error(transparent)]
    Compilation(Box<CompilationError>),

    /// The compiler exited successfully without producing its PDF. This is a
    /// defect in how the compiler was invoked, not in the document.
    #[error(
        "Internal inconsistency: compiler reported success but '{}' was not produced",
        expected.display()
    )]
    InternalInconsistency {
        expected: PathBuf,
        log: Option<String>,
    },

    #[error("Merge failed: {0}")]
    Merge(ComposerError),

    #[error("Compiling '{}' timed out after {after:?}", source_file.display())]
    Timeout { source_file: PathBuf, after: Duration },

    #[error("Compiler process error: {0}")]
    Process(#[from] ProcessError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Generation store error: {0}")]
    Store(#[from] StoreError),
}

impl PipelineError {
    /// Classified compiler diagnostics, empty unless this is a compilation error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            PipelineError::Compilation(failure) => &failure.diagnostics,
            _ => &[],
        }
    }

    /// The offending file, for the kinds that concern one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            PipelineError::NotFound { path } => Some(path),
            PipelineError::InternalInconsistency { expected, .. } => Some(expected),
            PipelineError::Timeout { source_file, .. } => Some(source_file),
            PipelineError::Merge(e) => e.path(),
            _ => None,
        }
    }
}

impl From<CompileError> for PipelineError {
    fn from(e: CompileError) -> Self {
        match e {
            CompileError::SourceNotFound(path) => PipelineError::NotFound { path },
            CompileError::Compilation(failure) => PipelineError::Compilation(failure),
            CompileError::MissingArtifact { expected, log } => {
                PipelineError::InternalInconsistency { expected, log }
            }
            CompileError::Timeout { source_file, after } => PipelineError::Timeout { source_file, after },
            CompileError::Process(e) => PipelineError::Process(e),
        }
    }
}

impl From<TemplateError> for PipelineError {
    fn from(e: TemplateError) -> Self {
        match e {
            TemplateError::NotFound(path) => PipelineError::NotFound { path },
            TemplateError::InvalidPath(path) => {
                PipelineError::Config(format!("Invalid template path: {}", path.display()))
            }
            TemplateError::Io { source, .. } => PipelineError::Io(source),
        }
    }
}

impl From<ComposerError> for PipelineError {
    fn from(e: ComposerError) -> Self {
        match e {
            ComposerError::NotFound(path) => PipelineError::NotFound { path },
            other => PipelineError::Merge(other),
        }
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Config(e.to_string())
    }
}
