use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::{Captures, Regex};

use crate::filename::file_stem;
use crate::observer::{IngestEvent, IngestObserver};
use crate::persist::AtomicFileWriter;
use crate::types::ExtractedImage;

const DEFAULT_IMAGE_EXTENSION: &str = ".png";

/// Extension for an image: bare format hint, else MIME table, else `.png`.
pub fn image_extension(hint: Option<&str>) -> String {
    let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) else {
        return DEFAULT_IMAGE_EXTENSION.to_string();
    };
    if hint.contains('/') {
        return mime_extension(hint)
            .unwrap_or(DEFAULT_IMAGE_EXTENSION)
            .to_string();
    }
    let format = hint.trim_start_matches('.');
    if !format.is_empty() && format.chars().all(|c| c.is_ascii_alphanumeric()) {
        format!(".{}", format.to_ascii_lowercase())
    } else {
        DEFAULT_IMAGE_EXTENSION.to_string()
    }
}

fn mime_extension(mime: &str) -> Option<&'static str> {
    let ext = match mime.to_ascii_lowercase().as_str() {
        "image/jpeg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        "image/bmp" => ".bmp",
        "image/tiff" => ".tiff",
        "image/webp" => ".webp",
        _ => return None,
    };
    Some(ext)
}

/// Writes engine-extracted images beside the target page and points the
/// `image_{n}` placeholders in the Markdown at them.
pub struct ImageRelocator {
    observer: Arc<dyn IngestObserver>,
}

impl ImageRelocator {
    pub fn new(observer: Arc<dyn IngestObserver>) -> Self {
        Self { observer }
    }

    /// Images that fail to write are reported and their references left as
    /// they were; the rest of the document is still returned.
    pub fn relocate(
        &self,
        markdown: &str,
        images: &[ExtractedImage],
        target_dir: &Path,
        original_filename: &str,
    ) -> String {
        if images.is_empty() {
            return markdown.to_string();
        }

        let stem = file_stem(original_filename);
        let writer = AtomicFileWriter::new(target_dir.to_path_buf());
        let mut rewritten = markdown.to_string();

        for image in images {
            let index = image.index;
            let file_name = format!(
                "{stem}_image_{index}{}",
                image_extension(image.format_hint.as_deref())
            );

            match writer.write_bytes(&file_name, &image.data) {
                Ok(path) => {
                    self.observer.notify(IngestEvent::ImageWritten { path });
                    rewritten = rewrite_references(&rewritten, index, &file_name);
                }
                Err(err) => {
                    self.observer.notify(IngestEvent::ImageFailed {
                        index,
                        path: target_dir.join(&file_name),
                        message: err.to_string(),
                    });
                }
            }
        }
        rewritten
    }
}

/// `![alt](image_N)`, `![alt](image_N.ext)` and `![alt](image_N )` become
/// `![alt](./file_name)`. `image_10` is not a match for `image_1`.
fn rewrite_references(markdown: &str, placeholder: usize, file_name: &str) -> String {
    let pattern = format!(r"!\[([^\]]*)\]\(image_{placeholder}(?:\.[^)]*)?\s*\)");
    let Ok(re) = Regex::new(&pattern) else {
        return markdown.to_string();
    };
    let destination = link_destination(file_name);
    re.replace_all(markdown, |caps: &Captures| {
        format!("![{}]({destination})", &caps[1])
    })
    .into_owned()
}

/// `./file_name`, in angle brackets when whitespace or parentheses would
/// otherwise end the link early.
fn link_destination(file_name: &str) -> String {
    let plain = format!("./{file_name}");
    if !plain.chars().any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '<' | '>')) {
        return plain;
    }
    let mut bracketed = String::with_capacity(plain.len() + 4);
    bracketed.push('<');
    for c in plain.chars() {
        if matches!(c, '<' | '>') {
            bracketed.push('\\');
        }
        bracketed.push(c);
    }
    bracketed.push('>');
    bracketed
}

/// Where a page's images live: the page's own directory under the target root.
pub(crate) fn image_dir_for(target_root: &Path, directory: &str) -> PathBuf {
    directory
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(target_root.to_path_buf(), |dir, segment| dir.join(segment))
}

#[cfg(test)]
mod tests {
    use super::rewrite_references;

    #[test]
    fn rewrites_all_placeholder_shapes() {
        let md = "![a](image_1) ![b](image_1.png) ![c](image_1 )";
        assert_eq!(
            rewrite_references(md, 1, "doc_image_1.png"),
            "![a](./doc_image_1.png) ![b](./doc_image_1.png) ![c](./doc_image_1.png)"
        );
    }

    #[test]
    fn names_with_spaces_or_parentheses_are_bracketed() {
        let md = "![chart](image_1)";
        assert_eq!(
            rewrite_references(md, 1, "Q3 report (final)_image_1.png"),
            "![chart](<./Q3 report (final)_image_1.png>)"
        );
        assert_eq!(
            rewrite_references(md, 1, "a<b>_image_1.png"),
            "![chart](<./a\\<b\\>_image_1.png>)"
        );
    }

    #[test]
    fn longer_index_is_left_alone() {
        let md = "![x](image_10) ![y](image_1)";
        assert_eq!(
            rewrite_references(md, 1, "f_image_1.png"),
            "![x](image_10) ![y](./f_image_1.png)"
        );
    }
}
