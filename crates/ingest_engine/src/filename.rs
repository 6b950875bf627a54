use std::path::Path;

/// Substituted by callers when a name sanitizes to nothing.
pub const FALLBACK_PAGE_NAME: &str = "untitled";

/// Filesystem- and URL-safe page name.
///
/// Forbidden characters and `.` become `_`, runs of whitespace/underscores
/// collapse to a single `_`, and separators never lead or trail. May return an
/// empty string; see [`page_name_or_fallback`].
pub fn sanitize_page_name(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len());
    let mut pending_separator = false;
    for c in name.chars() {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' || c.is_whitespace() {
            pending_separator = true;
            continue;
        }
        // Only emit a separator between two kept characters.
        if pending_separator && !cleaned.is_empty() {
            cleaned.push('_');
        }
        pending_separator = false;
        cleaned.push(c);
    }
    cleaned
}

pub fn page_name_or_fallback(name: &str, fallback: &str) -> String {
    let sanitized = sanitize_page_name(name);
    if sanitized.is_empty() {
        fallback.to_string()
    } else {
        sanitized
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' | '.')
        || (c.is_ascii_control() && !c.is_whitespace())
}

/// Leaf file name without its final extension.
pub fn file_stem(filename: &str) -> String {
    let leaf = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    Path::new(leaf)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `directory/base` or just `base` at the root.
pub fn join_page_name(directory: &str, base_name: &str) -> String {
    if directory.is_empty() {
        base_name.to_string()
    } else {
        format!("{directory}/{base_name}")
    }
}

/// Directory part of a forward-slash path; empty for the root.
pub fn page_directory(relative_path: &str) -> String {
    match relative_path.rsplit_once('/') {
        Some((dir, _)) if dir != "." => dir.to_string(),
        _ => String::new(),
    }
}
