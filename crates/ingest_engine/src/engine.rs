use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::types::ExtractedImage;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineOutput {
    pub markdown: String,
    /// Images referenced from `markdown` as `image_{index}` placeholders.
    pub images: Vec<ExtractedImage>,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Failed(String),
}

/// External document-to-Markdown converter. Built once and shared.
pub trait ConversionEngine: Send + Sync {
    fn name(&self) -> &str;

    /// `extension` is lower-case with its leading dot.
    fn supports(&self, extension: &str) -> bool;

    fn convert(&self, path: &Path) -> Result<EngineOutput, EngineError>;
}

/// Whether a conversion engine is installed. Checked once, at the converter boundary.
#[derive(Clone, Default)]
pub enum EngineCapability {
    Available(Arc<dyn ConversionEngine>),
    #[default]
    Unavailable,
}

impl EngineCapability {
    pub fn available(engine: impl ConversionEngine + 'static) -> Self {
        EngineCapability::Available(Arc::new(engine))
    }

    /// The engine, if one is installed and handles `extension`.
    pub fn for_extension(&self, extension: &str) -> Option<&dyn ConversionEngine> {
        match self {
            EngineCapability::Available(engine) if engine.supports(extension) => {
                Some(engine.as_ref())
            }
            _ => None,
        }
    }
}

impl fmt::Debug for EngineCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineCapability::Available(engine) => {
                f.debug_tuple("Available").field(&engine.name()).finish()
            }
            EngineCapability::Unavailable => f.write_str("Unavailable"),
        }
    }
}
