use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use scraper::{Html, Selector};

use crate::types::ExtractedImage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub title: Option<String>,
    pub content_html: String,
}

pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str) -> ExtractedContent;
}

/// Pulls the `<title>` text and the main content: `<article>`, else `<body>`,
/// else the whole document.
#[derive(Debug, Default)]
pub struct ReadabilityLikeExtractor;

impl Extractor for ReadabilityLikeExtractor {
    fn extract(&self, html: &str) -> ExtractedContent {
        let doc = Html::parse_document(html);

        let title = first_match(&doc, "title")
            .map(|t| t.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty());

        let content_html = first_match(&doc, "article")
            .or_else(|| first_match(&doc, "body"))
            .map(|node| node.inner_html())
            .unwrap_or_else(|| doc.root_element().html());

        ExtractedContent {
            title,
            content_html,
        }
    }
}

fn first_match<'a>(doc: &'a Html, selector: &str) -> Option<scraper::ElementRef<'a>> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel).next()
}

/// Replaces every `<img src="data:image/...;base64,...">` with the placeholder
/// `image_{n}` and returns the decoded bytes. Sources that are not inline
/// base64 images, or fail to decode, are left as they are.
pub fn lift_inline_images(html: &str) -> (String, Vec<ExtractedImage>) {
    let fragment = Html::parse_fragment(html);
    let Ok(img_sel) = Selector::parse("img[src]") else {
        return (html.to_string(), Vec::new());
    };

    let mut rewritten = html.to_string();
    let mut images = Vec::new();
    for element in fragment.select(&img_sel) {
        let Some(src) = element.value().attr("src") else {
            continue;
        };
        let Some((mime, data)) = decode_data_uri(src) else {
            continue;
        };
        let Some(pos) = rewritten.find(src) else {
            continue;
        };
        let index = images.len() + 1;
        rewritten.replace_range(pos..pos + src.len(), &format!("image_{index}"));
        images.push(ExtractedImage {
            index,
            format_hint: Some(mime),
            data,
        });
    }
    (rewritten, images)
}

fn decode_data_uri(src: &str) -> Option<(String, Vec<u8>)> {
    let rest = src.trim().strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let params = meta.strip_suffix(";base64")?;
    let mime = params.split(';').next()?.trim().to_ascii_lowercase();
    if !mime.starts_with("image/") {
        return None;
    }
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let data = STANDARD.decode(compact.as_bytes()).ok()?;
    Some((mime, data))
}

#[cfg(test)]
mod tests {
    use super::decode_data_uri;

    #[test]
    fn data_uri_must_be_base64_image() {
        assert_eq!(
            decode_data_uri("data:image/png;base64,aGk="),
            Some(("image/png".to_string(), b"hi".to_vec()))
        );
        assert_eq!(decode_data_uri("data:text/plain;base64,aGk="), None);
        assert_eq!(decode_data_uri("data:image/png,raw"), None);
        assert_eq!(decode_data_uri("https://example.com/a.png"), None);
    }
}
