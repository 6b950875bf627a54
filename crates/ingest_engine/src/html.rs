use std::fs;
use std::path::Path;

use crate::decode::decode_html;
use crate::engine::{ConversionEngine, EngineError, EngineOutput};
use crate::extract::{lift_inline_images, Extractor, ReadabilityLikeExtractor};
use crate::text::leading_heading_level;

/// Built-in engine for `.html` / `.htm`.
///
/// Inline base64 images are lifted out as extracted images so the relocator
/// can write them beside the page.
pub struct HtmlEngine {
    extractor: Box<dyn Extractor>,
}

impl HtmlEngine {
    pub fn new() -> Self {
        Self::with_extractor(Box::new(ReadabilityLikeExtractor))
    }

    pub fn with_extractor(extractor: Box<dyn Extractor>) -> Self {
        Self { extractor }
    }

    pub fn convert_html(&self, html: &str) -> EngineOutput {
        let extracted = self.extractor.extract(html);
        let (content_html, images) = lift_inline_images(&extracted.content_html);
        let mut markdown = html2md::parse_html(&content_html).trim().to_string();
        if let Some(title) = extracted.title.as_deref() {
            if leading_heading_level(&markdown).is_none() {
                markdown = format!("# {title}\n\n{markdown}");
            }
        }
        EngineOutput { markdown, images }
    }
}

impl Default for HtmlEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionEngine for HtmlEngine {
    fn name(&self) -> &str {
        "html"
    }

    fn supports(&self, extension: &str) -> bool {
        matches!(extension, ".html" | ".htm")
    }

    fn convert(&self, path: &Path) -> Result<EngineOutput, EngineError> {
        let bytes = fs::read(path).map_err(|source| EngineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let decoded = decode_html(&bytes).map_err(|err| EngineError::Failed(err.to_string()))?;
        Ok(self.convert_html(&decoded.html))
    }
}
