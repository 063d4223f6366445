//! LaTeX log classification.
//!
//! pdflatex reports problems as unstructured text in its `.log` file. This
//! crate turns that text into a short, ordered list of [`Diagnostic`]
//! variants a human can act on. [`parse`] is a pure function; every category
//! is collected by its own independent scan and the results are concatenated
//! in a fixed order.

mod diagnostic;
mod parser;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use parser::{MAX_DIAGNOSTICS, MAX_SUMMARISED_WARNINGS, parse};

/// Message shown when a failed compilation left nothing classifiable.
pub const UNKNOWN_ERROR: &str = "Unknown LaTeX error";

/// Joins diagnostics into a multi-line human summary, one entry per line.
pub fn summarize(diagnostics: &[Diagnostic]) -> String {
    if diagnostics.is_empty() {
        return UNKNOWN_ERROR.to_string();
    }
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
