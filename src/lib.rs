//! folio: LaTeX templates plus variables in, compiled and combined PDFs out.
//!
//! The work is split across the workspace crates and re-exported here:
//!
//! - `folio-template`: escaping and `\newcommand` variable substitution
//! - `folio-compiler`: one batch-mode compiler run per call, with classified
//!   failures from `folio-diagnostics`
//! - `folio-pdf-composer`: ordered, all-or-nothing PDF merge
//! - `folio-executor`: the tokio child-process runner
//!
//! [`DocumentPipeline`] ties them together.

pub mod error;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{
    ApplicationRequest, ArtifactLease, ArtifactLocks, Assembly, DocumentPipeline, PipelineBuilder,
    PipelineConfig, RenderedDocument, TemplateLibrary,
};

pub use folio_compiler::{
    CompilationArtifacts, CompilationError, CompilerConfig, CompilerLog, Diagnostic, DiagnosticKind,
    compilation_artifacts,
};
pub use folio_diagnostics::{MAX_DIAGNOSTICS, parse as parse_log, summarize};
pub use folio_executor::TokioProcessRunner;
pub use folio_pdf_composer::{ComposerError, merge_files};
pub use folio_template::{Template, VariableMap, binding_site_name, escape, substitute};
pub use folio_traits::{
    GenerationRecord, GenerationStore, InMemoryGenerationStore, ProcessError, ProcessOutput, ProcessRequest,
    ProcessRunner, StoreError,
};
