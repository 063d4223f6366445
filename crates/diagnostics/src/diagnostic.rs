use serde::{Deserialize, Serialize};
use std::fmt;

const EMERGENCY_STOP_MESSAGE: &str = "Fatal error occurred during compilation";

/// One classified entry extracted from a compiler log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A `! ...` error line.
    GenericError { message: String },
    /// `LaTeX Error: File `x' not found`; `file` is the missing class, package or input.
    MissingDependency { file: String },
    /// `Undefined control sequence.` with the `l.<N>` marker that follows it.
    UndefinedCommand { line: u32, context: String },
    /// `Package <name> Error: <message>`.
    PackageError { package: String, message: String },
    /// The compiler gave up (`Emergency stop.`).
    EmergencyStop,
    /// Fallback when no error was found: the first few warnings, joined.
    WarningSummary { warnings: Vec<String> },
}

/// Closed set of diagnostic categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    GenericError,
    MissingDependency,
    UndefinedCommand,
    PackageError,
    EmergencyStop,
    WarningSummary,
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::GenericError { .. } => DiagnosticKind::GenericError,
            Diagnostic::MissingDependency { .. } => DiagnosticKind::MissingDependency,
            Diagnostic::UndefinedCommand { .. } => DiagnosticKind::UndefinedCommand,
            Diagnostic::PackageError { .. } => DiagnosticKind::PackageError,
            Diagnostic::EmergencyStop => DiagnosticKind::EmergencyStop,
            Diagnostic::WarningSummary { .. } => DiagnosticKind::WarningSummary,
        }
    }

    /// The free-text payload, without the category prefix.
    pub fn message(&self) -> String {
        match self {
            Diagnostic::GenericError { message } => message.clone(),
            Diagnostic::MissingDependency { file } => file.clone(),
            Diagnostic::UndefinedCommand { context, .. } => context.clone(),
            Diagnostic::PackageError { message, .. } => message.clone(),
            Diagnostic::EmergencyStop => EMERGENCY_STOP_MESSAGE.to_string(),
            Diagnostic::WarningSummary { warnings } => warnings.join("; "),
        }
    }

    /// Source line number, where the log provides one.
    pub fn line(&self) -> Option<u32> {
        match self {
            Diagnostic::UndefinedCommand { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::GenericError { message } => write!(f, "Error: {}", message),
            Diagnostic::MissingDependency { file } => write!(f, "Missing file: {}", file),
            Diagnostic::UndefinedCommand { line, context } => {
                write!(f, "Undefined control sequence at line {}: {}", line, context)
            }
            Diagnostic::PackageError { package, message } => {
                write!(f, "Package {} error: {}", package, message)
            }
            Diagnostic::EmergencyStop => write!(f, "Emergency stop: {}", EMERGENCY_STOP_MESSAGE),
            Diagnostic::WarningSummary { warnings } => {
                write!(f, "Warnings detected: {}", warnings.join("; "))
            }
        }
    }
}
