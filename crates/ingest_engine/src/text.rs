use once_cell::sync::Lazy;
use regex::Regex;

use crate::decode::{decode_utf8_text, DecodeError};
use crate::types::{ConversionResult, ErrorKind, FileError};

/// Substrings that mark a line as code. Matched against the lower-cased line.
const CODE_INDICATORS: &[&str] = &[
    "def ",
    "function ",
    "class ",
    "import ",
    "from ",
    "#include",
    "public class",
    "private ",
    "protected ",
    "<?php",
    "<?xml",
    "<!doctype",
    "<html",
    "<script",
    "select ",
    "insert ",
    "update ",
    "delete ",
    "console.log",
    "print(",
    "printf(",
];

const CODE_LINE_ENDINGS: &[&str] = &[";", "{", "}", ":", "=>"];

static ATX_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A\s*(#{1,6})[ \t]+\S").unwrap());
static SETEXT_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A\s*[^\n]*\S[^\n]*\n(=+|-+)[ \t]*(?:\n|\z)").unwrap());

const INSPECTED_LINES: usize = 10;
const CODE_LINE_RATIO: f64 = 0.3;

pub(crate) fn decode(bytes: &[u8]) -> Result<String, FileError> {
    decode_utf8_text(bytes)
        .map_err(|err: DecodeError| FileError::new(ErrorKind::Decode, err.to_string()))
}

/// `.md` / `.markdown`: verbatim.
pub fn markdown_passthrough(bytes: &[u8]) -> ConversionResult {
    decode(bytes)
}

/// `.txt` / `.text`: fenced when it reads like code, verbatim otherwise.
pub fn plain_text_to_markdown(bytes: &[u8]) -> ConversionResult {
    let text = decode(bytes)?;
    if looks_like_code(&text) {
        Ok(fenced("", &text))
    } else {
        Ok(text)
    }
}

/// `.json`: parsed, re-indented with two spaces, fenced.
pub fn json_to_markdown(bytes: &[u8]) -> ConversionResult {
    let text = decode(bytes)?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|err| FileError::new(ErrorKind::Parse, format!("invalid JSON: {err}")))?;
    let pretty = serde_json::to_string_pretty(&value)
        .map_err(|err| FileError::new(ErrorKind::Parse, err.to_string()))?;
    Ok(format!("# JSON Data\n\n{}\n", fenced("json", &pretty)))
}

pub(crate) fn source_to_markdown(bytes: &[u8], language: &str, filename: &str) -> ConversionResult {
    let text = decode(bytes)?;
    Ok(format!("# {filename}\n\n{}\n", fenced(language, &text)))
}

/// Heuristic over the first lines: more than 30% of them look like code.
pub fn looks_like_code(content: &str) -> bool {
    let inspected: Vec<&str> = content.lines().take(INSPECTED_LINES).collect();
    if inspected.is_empty() {
        return false;
    }
    let code_like = inspected
        .iter()
        .filter(|line| is_code_like_line(line))
        .count();
    code_like as f64 > inspected.len() as f64 * CODE_LINE_RATIO
}

fn is_code_like_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    if CODE_INDICATORS.iter().any(|marker| lower.contains(marker)) {
        return true;
    }
    let trimmed = line.trim();
    CODE_LINE_ENDINGS.iter().any(|end| trimmed.ends_with(end))
}

/// Level of the heading the document opens with, ATX or setext.
pub(crate) fn leading_heading_level(markdown: &str) -> Option<usize> {
    if let Some(caps) = ATX_HEADING.captures(markdown) {
        return Some(caps[1].len());
    }
    let caps = SETEXT_HEADING.captures(markdown)?;
    if caps[1].starts_with('=') {
        Some(1)
    } else {
        Some(2)
    }
}

/// Wraps `body` in a backtick fence longer than any run inside it.
pub(crate) fn fenced(language: &str, body: &str) -> String {
    let longest_run = body
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    let body = body.trim_end_matches(['\n', '\r']);
    format!("{fence}{language}\n{body}\n{fence}")
}

#[cfg(test)]
mod tests {
    use super::{fenced, is_code_like_line, leading_heading_level, looks_like_code};

    #[test]
    fn line_endings_count_as_code() {
        assert!(is_code_like_line("  x = compute();"));
        assert!(is_code_like_line("items.map(x => {"));
        assert!(is_code_like_line("}"));
        assert!(!is_code_like_line("Plain words and nothing else."));
    }

    #[test]
    fn indicators_are_case_insensitive() {
        assert!(is_code_like_line("SELECT id FROM users"));
        assert!(is_code_like_line("<HTML lang=\"en\">"));
    }

    #[test]
    fn only_first_ten_lines_are_inspected() {
        let mut content = "Just a sentence here.\n".repeat(10);
        content.push_str(&"int x = 1;\n".repeat(30));
        assert!(!looks_like_code(&content));
    }

    #[test]
    fn empty_content_is_not_code() {
        assert!(!looks_like_code(""));
    }

    #[test]
    fn fence_outgrows_embedded_backticks() {
        let wrapped = fenced("", "before\n```\ninside\n```\n");
        assert!(wrapped.starts_with("````\n"));
        assert!(wrapped.ends_with("\n````"));
    }

    #[test]
    fn detects_atx_and_setext_headings() {
        assert_eq!(leading_heading_level("# Title\n\nbody"), Some(1));
        assert_eq!(leading_heading_level("\n### Deep"), Some(3));
        assert_eq!(leading_heading_level("Title\n=====\n\nbody"), Some(1));
        assert_eq!(leading_heading_level("Sub\n---\n"), Some(2));
        assert_eq!(leading_heading_level("#hashtag only"), None);
        assert_eq!(leading_heading_level("plain paragraph"), None);
    }
}
