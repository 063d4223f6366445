use crate::escape::escape;
use crate::variables::VariableMap;
use log::debug;
use regex::Regex;

/// Derives the binding-site name for a variable key: `company_name` binds to
/// `\companyname`. LaTeX command names cannot contain underscores.
pub fn binding_site_name(key: &str) -> String {
    key.replace('_', "")
}

/// Matches `\newcommand{\<name>}` and the opening brace of its default. The
/// declaration wrapper is kept verbatim; only the payload is replaced.
fn binding_site_pattern(name: &str) -> Option<Regex> {
    let pattern = format!(r"\\newcommand\s*\{{\s*\\{}\s*\}}\s*\{{", regex::escape(name));
    Regex::new(&pattern).ok()
}

/// Byte offset of the brace closing the group opened at `open`, honouring
/// nesting. Escaped braces (`\{`, `\}`) do not count. `None` if unbalanced.
fn closing_brace(content: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut chars = content[open..].char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Replaces the payload of every site `pattern` finds. Returns `None` when no
/// site could be rewritten.
fn replace_sites(content: &str, pattern: &Regex, value: &str) -> Option<String> {
    let mut result = String::with_capacity(content.len());
    let mut cursor = 0;
    let mut replaced = false;

    for site in pattern.find_iter(content) {
        if site.start() < cursor {
            continue;
        }
        let open = site.end() - 1;
        let Some(close) = closing_brace(content, open) else {
            debug!("Unbalanced default at byte {}, left untouched", site.start());
            continue;
        };
        result.push_str(&content[cursor..=open]);
        result.push_str(value);
        cursor = close;
        replaced = true;
    }

    if !replaced {
        return None;
    }
    result.push_str(&content[cursor..]);
    Some(result)
}

/// Rewrites every binding site in `content` that has a non-empty value in
/// `variables`.
///
/// Keys with empty values leave the template's own default in place. Keys
/// with no matching site are ignored. Every occurrence of a site is replaced.
/// A default whose braces do not balance is left as it is.
pub fn substitute(content: &str, variables: &VariableMap) -> String {
    let mut result = content.to_string();

    for (key, value) in variables.iter() {
        if value.is_empty() {
            continue;
        }
        let name = binding_site_name(key);
        if name.is_empty() {
            continue;
        }

        let Some(pattern) = binding_site_pattern(&name) else {
            continue;
        };
        match replace_sites(&result, &pattern, &escape(value)) {
            Some(rewritten) => result = rewritten,
            None => debug!("No binding site \\{} for variable '{}'", name, key),
        }
    }

    result
}
