use std::collections::HashSet;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use thiserror::Error;

use crate::dispatch::{FileSource, SingleFileConverter};
use crate::engine::EngineCapability;
use crate::filename::{file_stem, page_directory, page_name_or_fallback};
use crate::format::extension_of;
use crate::images::image_dir_for;
use crate::observer::{IngestEvent, IngestObserver};
use crate::persist::AtomicFileWriter;
use crate::resolve::NameResolver;
use crate::settings::IngestSettings;
use crate::store::PageStore;
use crate::types::{ErrorKind, FileError, PageCandidate, UploadedFile};

/// Batch-wide failure; per-file problems never surface here.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot create scratch directory: {0}")]
    Scratch(#[source] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    EmptyName,
    Unsupported { extension: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyName => write!(f, "empty file name"),
            SkipReason::Unsupported { extension } if extension.is_empty() => {
                write!(f, "unsupported file without extension")
            }
            SkipReason::Unsupported { extension } => {
                write!(f, "unsupported file type {extension}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub relative_path: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub relative_path: String,
    pub error: FileError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub relative_path: String,
    pub page: PageCandidate,
}

/// Outcome of one folder upload, in upload order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    label: String,
    entries: Vec<BatchEntry>,
    skipped: Vec<SkippedFile>,
    failed: Vec<FailedFile>,
}

impl BatchResult {
    fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            entries: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// First page produced from `relative_path`.
    pub fn get(&self, relative_path: &str) -> Option<&PageCandidate> {
        self.entries
            .iter()
            .find(|entry| entry.relative_path == relative_path)
            .map(|entry| &entry.page)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    pub fn failed(&self) -> &[FailedFile] {
        &self.failed
    }

    pub fn summary(&self) -> String {
        self.summary_with_stored(self.entries.len())
    }

    /// Summary after committing, when only `stored` of the entries reached the store.
    pub fn summary_with_stored(&self, stored: usize) -> String {
        let mut created = format!("created {}", plural(stored, "page"));
        let unstored = self.entries.len().saturating_sub(stored);
        if unstored > 0 {
            created.push_str(&format!(", {unstored} could not be stored"));
        }
        format!(
            "Processed folder '{}': {created}, skipped {}, failed {}",
            self.label,
            plural(self.skipped.len(), "file"),
            plural(self.failed.len(), "file"),
        )
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

struct MaterializedFile {
    relative_path: String,
    /// Normalized forward-slash path used for naming.
    normalized: String,
    scratch_path: PathBuf,
}

/// Converts and names every file of a folder upload.
///
/// Runs on the calling thread. Names are checked against the store and
/// against names already claimed in the same batch, so siblings never
/// collide. Nothing is locked across batches.
pub struct FolderIngestor {
    converter: SingleFileConverter,
    resolver: NameResolver,
    store: Arc<dyn PageStore>,
    observer: Arc<dyn IngestObserver>,
    settings: IngestSettings,
}

impl FolderIngestor {
    pub fn new(
        store: Arc<dyn PageStore>,
        engine: EngineCapability,
        settings: IngestSettings,
        observer: Arc<dyn IngestObserver>,
    ) -> Self {
        let converter = SingleFileConverter::new(engine, observer.clone())
            .with_source_files(settings.include_source_files);
        let resolver = NameResolver::from_settings(&settings, observer.clone());
        Self {
            converter,
            resolver,
            store,
            observer,
            settings,
        }
    }

    pub fn converter(&self) -> &SingleFileConverter {
        &self.converter
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    pub fn store(&self) -> &dyn PageStore {
        self.store.as_ref()
    }

    pub fn settings(&self) -> &IngestSettings {
        &self.settings
    }

    /// The scratch directory is removed when this returns, whatever happened.
    /// Images written under `target_root` stay.
    pub fn ingest(
        &self,
        files: &[UploadedFile],
        target_root: &Path,
        batch_label: &str,
    ) -> Result<BatchResult, IngestError> {
        let scratch = self.create_scratch()?;
        let mut batch = BatchResult::new(batch_label);

        let mut materialized = Vec::with_capacity(files.len());
        let mut taken_paths = HashSet::new();
        for (position, file) in files.iter().enumerate() {
            match self.materialize(scratch.path(), position, file, &mut taken_paths) {
                Ok(Some(item)) => materialized.push(item),
                Ok(None) => self.skip(&mut batch, &file.relative_path, SkipReason::EmptyName),
                Err(error) => self.fail(&mut batch, &file.relative_path, error),
            }
        }

        let mut claimed = HashSet::new();
        for item in &materialized {
            self.process(item, target_root, &mut claimed, &mut batch);
        }

        self.observer.notify(IngestEvent::BatchCompleted {
            label: batch_label.to_string(),
            created: batch.entries.len(),
            skipped: batch.skipped.len(),
            failed: batch.failed.len(),
        });
        Ok(batch)
    }

    fn create_scratch(&self) -> Result<TempDir, IngestError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("ingest-batch-");
        match &self.settings.scratch_parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .map_err(IngestError::Scratch)
    }

    fn materialize(
        &self,
        scratch_root: &Path,
        position: usize,
        file: &UploadedFile,
        taken_paths: &mut HashSet<String>,
    ) -> Result<Option<MaterializedFile>, FileError> {
        let Some(normalized) = normalize_relative_path(&file.relative_path)? else {
            return Ok(None);
        };

        // A repeated path gets its own subtree instead of overwriting the first copy.
        let base = if taken_paths.insert(normalized.clone()) {
            scratch_root.to_path_buf()
        } else {
            scratch_root.join(format!(".dup-{position}"))
        };
        let (dirs, leaf) = match normalized.rsplit_once('/') {
            Some((dirs, leaf)) => (dirs, leaf),
            None => ("", normalized.as_str()),
        };
        let dir = image_dir_for(&base, dirs);
        let scratch_path = AtomicFileWriter::new(dir)
            .write_bytes(leaf, &file.bytes)
            .map_err(|err| {
                FileError::new(ErrorKind::Write, format!("materializing failed: {err}"))
            })?;

        self.observer.notify(IngestEvent::FileMaterialized {
            relative_path: file.relative_path.clone(),
            bytes: file.bytes.len() as u64,
        });
        Ok(Some(MaterializedFile {
            relative_path: file.relative_path.clone(),
            normalized,
            scratch_path,
        }))
    }

    fn process(
        &self,
        item: &MaterializedFile,
        target_root: &Path,
        claimed: &mut HashSet<String>,
        batch: &mut BatchResult,
    ) {
        let filename = item
            .normalized
            .rsplit('/')
            .next()
            .unwrap_or(&item.normalized);
        if !self.converter.is_supported(filename) {
            let extension = extension_of(filename).unwrap_or_default();
            self.skip(batch, &item.relative_path, SkipReason::Unsupported { extension });
            return;
        }

        let directory = page_directory(&item.normalized);
        let base_name = page_name_or_fallback(&file_stem(filename), &self.settings.fallback_name);
        let exists = |full_name: &str| claimed.contains(full_name) || self.store.exists(full_name);
        let resolved = self.resolver.resolve(&base_name, &directory, &exists);

        let image_dir = image_dir_for(target_root, &directory);
        match self
            .converter
            .convert(FileSource::Path(&item.scratch_path), filename, &image_dir)
        {
            Ok(content) => {
                let page = PageCandidate::new(resolved, directory, content);
                claimed.insert(page.full_name().to_string());
                self.observer.notify(IngestEvent::PageResolved {
                    relative_path: item.relative_path.clone(),
                    full_name: page.full_name().to_string(),
                });
                batch.entries.push(BatchEntry {
                    relative_path: item.relative_path.clone(),
                    page,
                });
            }
            Err(error) => self.fail(batch, &item.relative_path, error),
        }
    }

    fn skip(&self, batch: &mut BatchResult, relative_path: &str, reason: SkipReason) {
        self.observer.notify(IngestEvent::FileSkipped {
            relative_path: relative_path.to_string(),
            reason: reason.to_string(),
        });
        batch.skipped.push(SkippedFile {
            relative_path: relative_path.to_string(),
            reason,
        });
    }

    fn fail(&self, batch: &mut BatchResult, relative_path: &str, error: FileError) {
        self.observer.notify(IngestEvent::FileFailed {
            relative_path: relative_path.to_string(),
            kind: error.kind,
            message: error.message.clone(),
        });
        batch.failed.push(FailedFile {
            relative_path: relative_path.to_string(),
            error,
        });
    }
}

/// Forward-slash path with empty and `.` segments dropped. `None` when nothing
/// is left; an error when the path is absolute or a segment climbs out with `..`.
pub(crate) fn normalize_relative_path(raw: &str) -> Result<Option<String>, FileError> {
    if is_absolute(raw.trim_start()) {
        return Err(FileError::new(
            ErrorKind::Write,
            format!("path {raw:?} is absolute"),
        ));
    }
    let segments: Vec<&str> = raw
        .split(['/', '\\'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    if segments.iter().any(|segment| *segment == "..") {
        return Err(FileError::new(
            ErrorKind::Write,
            format!("path {raw:?} escapes the upload root"),
        ));
    }
    if segments.is_empty() {
        return Ok(None);
    }
    Ok(Some(segments.join("/")))
}

/// Rooted (`/x`, `\\x`) or drive-prefixed (`C:x`), on any platform.
fn is_absolute(path: &str) -> bool {
    match path.as_bytes() {
        [b'/' | b'\\', ..] => true,
        [drive, b':', ..] => drive.is_ascii_alphabetic(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_relative_path;

    #[test]
    fn normalizes_separators_and_dots() {
        assert_eq!(
            normalize_relative_path("./docs\\api//guide.md").unwrap(),
            Some("docs/api/guide.md".to_string())
        );
    }

    #[test]
    fn absolute_and_drive_paths_are_rejected() {
        for raw in ["/abs/file.md", "\\\\server\\share\\x.md", " /etc/guide.md", "C:/x.md", "d:report.md"] {
            assert!(normalize_relative_path(raw).is_err(), "{raw}");
        }
        assert_eq!(
            normalize_relative_path("notes/C:/x.md").unwrap(),
            Some("notes/C:/x.md".to_string())
        );
    }

    #[test]
    fn empty_names_normalize_to_none() {
        assert_eq!(normalize_relative_path("").unwrap(), None);
        assert_eq!(normalize_relative_path("./").unwrap(), None);
    }

    #[test]
    fn parent_segments_are_rejected() {
        assert!(normalize_relative_path("../etc/passwd").is_err());
        assert!(normalize_relative_path("docs/../../x.md").is_err());
    }
}
