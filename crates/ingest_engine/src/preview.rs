const ELLIPSIS: &str = "...";
pub const MAX_PREVIEW_CHARS: usize = 100;

/// One-line teaser of a page: whitespace collapsed, cut to
/// [`MAX_PREVIEW_CHARS`] characters with `...` appended when longer.
pub fn content_preview(markdown: &str) -> String {
    let flattened = markdown.split_whitespace().collect::<Vec<_>>().join(" ");
    match flattened.char_indices().nth(MAX_PREVIEW_CHARS) {
        Some((end, _)) => format!("{}{ELLIPSIS}", &flattened[..end]),
        None => flattened,
    }
}

#[cfg(test)]
mod tests {
    use super::{content_preview, MAX_PREVIEW_CHARS};

    #[test]
    fn short_content_kept_on_one_line() {
        assert_eq!(content_preview("# Title\n\nbody  text\n"), "# Title body text");
    }

    #[test]
    fn long_content_is_cut_on_char_boundary() {
        let content = "é".repeat(MAX_PREVIEW_CHARS + 20);
        let preview = content_preview(&content);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), MAX_PREVIEW_CHARS + 3);
    }

    #[test]
    fn exactly_max_chars_is_not_truncated() {
        let content = "a".repeat(MAX_PREVIEW_CHARS);
        assert_eq!(content_preview(&content), content);
    }
}
