use crate::diagnostic::Diagnostic;
use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on entries returned by [`parse`], across all categories.
pub const MAX_DIAGNOSTICS: usize = 10;

/// Number of warnings folded into a [`Diagnostic::WarningSummary`].
pub const MAX_SUMMARISED_WARNINGS: usize = 3;

static ERROR_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^! (.+?)\r?$").expect("error-line pattern is valid"));

static MISSING_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"LaTeX Error: File `([^']+)' not found").expect("missing-file pattern is valid")
});

static UNDEFINED_CONTROL_SEQUENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Undefined control sequence\.\s*l\.(\d+)[ \t]*([^\r\n]*)")
        .expect("undefined-control-sequence pattern is valid")
});

static PACKAGE_ERROR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Package (\w+) Error: ([^\r\n]+)").expect("package-error pattern is valid")
});

static WARNING_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:LaTeX Warning|Package \w+ Warning): (.+?)\r?$")
        .expect("warning pattern is valid")
});

const EMERGENCY_STOP: &str = "Emergency stop.";

fn error_lines(log: &str) -> impl Iterator<Item = Diagnostic> + '_ {
    ERROR_LINE.captures_iter(log).map(|caps| Diagnostic::GenericError {
        message: caps[1].trim().to_string(),
    })
}

fn missing_files(log: &str) -> impl Iterator<Item = Diagnostic> + '_ {
    MISSING_FILE.captures_iter(log).map(|caps| Diagnostic::MissingDependency {
        file: caps[1].to_string(),
    })
}

fn undefined_commands(log: &str) -> impl Iterator<Item = Diagnostic> + '_ {
    UNDEFINED_CONTROL_SEQUENCE
        .captures_iter(log)
        .filter_map(|caps| {
            let line = caps[1].parse().ok()?;
            let context = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
                .unwrap_or("unknown command");
            Some(Diagnostic::UndefinedCommand {
                line,
                context: context.to_string(),
            })
        })
}

fn package_errors(log: &str) -> impl Iterator<Item = Diagnostic> + '_ {
    PACKAGE_ERROR.captures_iter(log).map(|caps| Diagnostic::PackageError {
        package: caps[1].to_string(),
        message: caps[2].trim().to_string(),
    })
}

fn emergency_stop(log: &str) -> Option<Diagnostic> {
    log.contains(EMERGENCY_STOP).then_some(Diagnostic::EmergencyStop)
}

fn warning_summary(log: &str) -> Option<Diagnostic> {
    let warnings: Vec<String> = WARNING_LINE
        .captures_iter(log)
        .take(MAX_SUMMARISED_WARNINGS)
        .map(|caps| caps[1].trim().to_string())
        .collect();
    (!warnings.is_empty()).then_some(Diagnostic::WarningSummary { warnings })
}

/// Classifies a compiler log into at most [`MAX_DIAGNOSTICS`] entries.
///
/// Categories are scanned independently and concatenated in this order:
/// `!` error lines, missing files, undefined control sequences, package
/// errors, emergency stop. Only when none of those match does the log's
/// warnings get summarised into a single entry. An empty result means the
/// log held nothing recognisable.
pub fn parse(log: &str) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = error_lines(log)
        .chain(missing_files(log))
        .chain(undefined_commands(log))
        .chain(package_errors(log))
        .chain(emergency_stop(log))
        .collect();

    if diagnostics.is_empty() {
        diagnostics.extend(warning_summary(log));
    }

    diagnostics.truncate(MAX_DIAGNOSTICS);
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiagnosticKind;

    fn kinds(diagnostics: &[Diagnostic]) -> Vec<DiagnosticKind> {
        diagnostics.iter().map(Diagnostic::kind).collect()
    }

    #[test]
    fn test_undefined_control_sequence_with_line_number() {
        let log = "! Undefined control sequence.\nl.42 \\foo\n";
        let diagnostics = parse(log);

        let undefined: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.kind() == DiagnosticKind::UndefinedCommand)
            .collect();
        assert_eq!(undefined.len(), 1);
        assert_eq!(undefined[0].line(), Some(42));
        assert_eq!(undefined[0].message(), r"\foo");
    }

    #[test]
    fn test_undefined_control_sequence_without_context() {
        let log = "! Undefined control sequence.\nl.9\n";
        let diagnostics = parse(log);
        assert!(diagnostics.contains(&Diagnostic::UndefinedCommand {
            line: 9,
            context: "unknown command".to_string(),
        }));
    }

    #[test]
    fn test_missing_package() {
        let log = "\
(./letter.tex
! LaTeX Error: File `nonexistentpkg.sty' not found.

Type X to quit or <RETURN> to proceed,
! Emergency stop.
<read *>
";
        let diagnostics = parse(log);
        let missing: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.kind() == DiagnosticKind::MissingDependency)
            .collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].message(), "nonexistentpkg.sty");
        assert_eq!(
            kinds(&diagnostics),
            vec![
                DiagnosticKind::GenericError,
                DiagnosticKind::GenericError,
                DiagnosticKind::MissingDependency,
                DiagnosticKind::EmergencyStop,
            ]
        );
    }

    #[test]
    fn test_package_error() {
        let log = "! Package inputenc Error: Unicode character ≠ (U+2260)\n";
        let diagnostics = parse(log);
        assert_eq!(
            diagnostics[1],
            Diagnostic::PackageError {
                package: "inputenc".to_string(),
                message: "Unicode character ≠ (U+2260)".to_string(),
            }
        );
    }

    #[test]
    fn test_scan_order_is_fixed() {
        let log = "\
! Emergency stop.
! Package xcolor Error: Undefined color `brand'.
! Undefined control sequence.
l.3 \\bad
! LaTeX Error: File `a.sty' not found.
";
        let diagnostics = parse(log);
        let tail: Vec<_> = kinds(&diagnostics).into_iter().skip(4).collect();
        assert_eq!(
            tail,
            vec![
                DiagnosticKind::MissingDependency,
                DiagnosticKind::UndefinedCommand,
                DiagnosticKind::PackageError,
                DiagnosticKind::EmergencyStop,
            ]
        );
    }

    #[test]
    fn test_result_is_capped() {
        let log: String = (0..50).map(|i| format!("! Error number {}\n", i)).collect();
        let diagnostics = parse(&log);
        assert_eq!(diagnostics.len(), MAX_DIAGNOSTICS);
        assert_eq!(diagnostics[0].message(), "Error number 0");
        assert_eq!(diagnostics[9].message(), "Error number 9");
    }

    #[test]
    fn test_warnings_only_when_no_errors() {
        let log = "\
LaTeX Warning: Reference `sec:intro' on page 1 undefined on input line 12.
Package hyperref Warning: Token not allowed in a PDF string.
LaTeX Warning: Label(s) may have changed.
LaTeX Warning: There were undefined references.
";
        let diagnostics = parse(log);
        assert_eq!(diagnostics.len(), 1);
        match &diagnostics[0] {
            Diagnostic::WarningSummary { warnings } => {
                assert_eq!(warnings.len(), MAX_SUMMARISED_WARNINGS);
                assert_eq!(warnings[1], "Token not allowed in a PDF string.");
            }
            other => panic!("expected warning summary, got {:?}", other),
        }
    }

    #[test]
    fn test_warnings_ignored_when_errors_present() {
        let log = "LaTeX Warning: Something odd.\n! Missing $ inserted.\n";
        assert_eq!(kinds(&parse(log)), vec![DiagnosticKind::GenericError]);
    }

    #[test]
    fn test_crlf_logs() {
        let log = "! Missing } inserted.\r\nLaTeX Warning: ignored\r\n";
        let diagnostics = parse(log);
        assert_eq!(diagnostics[0].message(), "Missing } inserted.");
    }

    #[test]
    fn test_clean_log_yields_nothing() {
        let log = "This is pdfTeX, Version 3.141592653\nOutput written on cv.pdf (1 page).\n";
        assert!(parse(log).is_empty());
        assert!(parse("").is_empty());
    }
}
