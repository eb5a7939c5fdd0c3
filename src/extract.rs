use std::path::Path;
use tracing::warn;

/// Keywords that open a type-defining declaration. The loader recognizes
/// both kinds of symbol, so both are indexed.
const DECLARATION_KEYWORDS: [&str; 2] = ["class", "interface"];

/// Reads `path` and extracts every declared type name, in declaration order.
///
/// An unreadable file yields an empty list rather than an error; zero-match
/// files and read failures are indistinguishable to the caller.
pub fn extract_from_file(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => extract_type_names(&content),
        Err(err) => {
            warn!(path = %path.display(), %err, "skipping unreadable source file");
            Vec::new()
        }
    }
}

/// Finds every line, possibly indented, that starts with a type-declaration
/// keyword followed by an identifier. Keyword matching is case-insensitive.
pub fn extract_type_names(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(declared_type_name)
        .map(str::to_string)
        .collect()
}

fn declared_type_name(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();

    for keyword in DECLARATION_KEYWORDS {
        let Some(prefix) = trimmed.get(..keyword.len()) else {
            continue;
        };
        if !prefix.eq_ignore_ascii_case(keyword) {
            continue;
        }

        // Require whitespace after the keyword so `classroom` never matches.
        let rest = &trimmed[keyword.len()..];
        if !rest.starts_with(|c: char| c.is_whitespace()) {
            continue;
        }

        let token = rest.trim_start();
        let bytes = token.as_bytes();
        let end = bytes
            .iter()
            .position(|b| !(b.is_ascii_alphanumeric() || *b == b'_'))
            .unwrap_or(bytes.len());
        if end == 0 || bytes[0].is_ascii_digit() {
            continue;
        }
        return Some(&token[..end]);
    }

    None
}
