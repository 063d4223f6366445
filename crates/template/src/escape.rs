/// Escape rules in priority order.
///
/// The backslash rule comes first because every other replacement introduces
/// new backslashes. [`escape`] applies the table in a single pass over the
/// input characters, so replacement text is never scanned again and a user's
/// literal backslash can only ever become one `\textbackslash{}`.
pub const ESCAPE_RULES: &[(char, &str)] = &[
    ('\\', r"\textbackslash{}"),
    ('&', r"\&"),
    ('%', r"\%"),
    ('$', r"\$"),
    ('#', r"\#"),
    ('_', r"\_"),
    ('{', r"\{"),
    ('}', r"\}"),
    ('~', r"\textasciitilde{}"),
    ('^', r"\textasciicircum{}"),
];

fn rule_for(c: char) -> Option<&'static str> {
    ESCAPE_RULES
        .iter()
        .find(|(special, _)| *special == c)
        .map(|(_, replacement)| *replacement)
}

/// Makes arbitrary text safe to place inside a `\newcommand` value.
///
/// Total over all inputs, including the empty string.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match rule_for(c) {
            Some(replacement) => escaped.push_str(replacement),
            None => escaped.push(c),
        }
    }
    escaped
}
