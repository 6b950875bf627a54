use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::filename::FALLBACK_PAGE_NAME;
use crate::resolve::{timestamp_now, Clock, MAX_SUFFIX_ATTEMPTS};

#[derive(Clone)]
pub struct IngestSettings {
    /// Numbered suffixes tried before falling back to a timestamp.
    pub max_suffix_attempts: u32,
    pub fallback_name: String,
    /// Accept common source and config files as fenced code pages.
    pub include_source_files: bool,
    /// Parent for the per-batch scratch directory; system temp dir when `None`.
    pub scratch_parent: Option<PathBuf>,
    /// Timestamp used by the naming fallback.
    pub clock: Clock,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            max_suffix_attempts: MAX_SUFFIX_ATTEMPTS,
            fallback_name: FALLBACK_PAGE_NAME.to_string(),
            include_source_files: false,
            scratch_parent: None,
            clock: Arc::new(timestamp_now),
        }
    }
}

impl fmt::Debug for IngestSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestSettings")
            .field("max_suffix_attempts", &self.max_suffix_attempts)
            .field("fallback_name", &self.fallback_name)
            .field("include_source_files", &self.include_source_files)
            .field("scratch_parent", &self.scratch_parent)
            .finish_non_exhaustive()
    }
}
