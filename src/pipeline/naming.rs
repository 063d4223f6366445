use chrono::{DateTime, Utc};

/// Label used when the caller supplies none, or nothing survives sanitising.
pub const DEFAULT_LABEL: &str = "combined";

const MAX_LABEL_CHARS: usize = 50;

/// Keeps alphanumerics, spaces, hyphens and underscores, trims, turns spaces
/// into underscores and truncates to 50 characters.
pub fn sanitize_label(label: &str) -> String {
    let kept: String = label
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe: String = kept
        .trim()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .take(MAX_LABEL_CHARS)
        .collect();

    if safe.is_empty() {
        DEFAULT_LABEL.to_string()
    } else {
        safe
    }
}

/// `<label>_application_<YYYYMMDD_HHMMSS>.pdf`, with the timestamp in UTC.
pub fn combined_file_name(label: Option<&str>, at: DateTime<Utc>) -> String {
    let label = label.map_or_else(|| DEFAULT_LABEL.to_string(), sanitize_label);
    format!("{}_application_{}.pdf", label, at.format("%Y%m%d_%H%M%S"))
}
