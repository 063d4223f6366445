//! Compiler invocation for LaTeX documents.
//!
//! [`LatexCompiler`] runs the external compiler exactly once per call, in
//! batch mode, with its artifacts directed into an output directory. Success
//! yields the path of the produced PDF. Failure yields a [`CompileError`]
//! whose [`CompilationError`] variant carries the captured streams, the raw
//! log and the classified diagnostics.
//!
//! There is no automatic second pass. Callers that need cross-references
//! resolved call [`LatexCompiler::compile`] again.

mod artifacts;
mod compiler;
mod config;
mod error;

pub use artifacts::{CompilationArtifacts, artifact_path, compilation_artifacts};
pub use compiler::LatexCompiler;
pub use config::{CompilerConfig, DEFAULT_PROGRAM, DEFAULT_TIMEOUT_SECS};
pub use error::{CompilationError, CompileError, CompilerLog};

// Re-export the diagnostic types carried by compilation errors
pub use folio_diagnostics::{Diagnostic, DiagnosticKind};
