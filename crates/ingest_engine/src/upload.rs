use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::dispatch::FileSource;
use crate::filename::{file_stem, page_name_or_fallback};
use crate::images::image_dir_for;
use crate::ingest::{normalize_relative_path, FolderIngestor};
use crate::observer::{IngestEvent, IngestObserver};
use crate::store::page_filename;
use crate::types::{FileError, PageCandidate, UploadedFile};

/// What the client asked for.
#[derive(Debug, Clone)]
pub enum UploadRequest {
    None,
    File {
        file: UploadedFile,
        /// Target page name; derived from the file name when blank.
        page_name: Option<String>,
    },
    Folder {
        files: Vec<UploadedFile>,
        label: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPage {
    pub relative_path: String,
    pub page_name: String,
    pub full_page_name: String,
    pub content: String,
    /// Directory the page file and its images live in.
    pub page_directory: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub created_pages: Vec<CreatedPage>,
}

impl UploadResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            created_pages: Vec::new(),
        }
    }
}

/// Entry point for uploads: converts, names and commits pages to the store.
pub struct UploadService {
    ingestor: FolderIngestor,
    target_root: PathBuf,
    author: String,
    observer: Arc<dyn IngestObserver>,
}

impl UploadService {
    pub fn new(
        ingestor: FolderIngestor,
        target_root: PathBuf,
        author: impl Into<String>,
        observer: Arc<dyn IngestObserver>,
    ) -> Self {
        Self {
            ingestor,
            target_root,
            author: author.into(),
            observer,
        }
    }

    pub fn ingestor(&self) -> &FolderIngestor {
        &self.ingestor
    }

    pub fn target_root(&self) -> &Path {
        &self.target_root
    }

    pub fn handle(&self, request: UploadRequest) -> UploadResponse {
        match request {
            UploadRequest::None => UploadResponse {
                success: true,
                message: "no upload requested".to_string(),
                created_pages: Vec::new(),
            },
            UploadRequest::File { file, page_name } => {
                self.handle_file(&file, page_name.as_deref())
            }
            UploadRequest::Folder { files, label } => self.handle_folder(&files, &label),
        }
    }

    fn handle_file(&self, file: &UploadedFile, page_name: Option<&str>) -> UploadResponse {
        let normalized = match normalize_relative_path(&file.relative_path) {
            Ok(Some(normalized)) => normalized,
            Ok(None) => return UploadResponse::failure("uploaded file has no name"),
            Err(err) => return UploadResponse::failure(err.to_string()),
        };
        let filename = normalized.rsplit('/').next().unwrap_or(&normalized);
        let converter = self.ingestor.converter();
        if !converter.is_supported(filename) {
            return UploadResponse::failure(format!("Unsupported file type: {filename}"));
        }

        let fallback = &self.ingestor.settings().fallback_name;
        let (directory, base_name) = match page_name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(explicit) => match split_explicit_name(explicit, fallback) {
                Ok(parts) => parts,
                Err(err) => return UploadResponse::failure(err.to_string()),
            },
            None => (String::new(), page_name_or_fallback(&file_stem(filename), fallback)),
        };

        let store = self.ingestor.store();
        let exists = |full_name: &str| store.exists(full_name);
        let resolved = self.ingestor.resolver().resolve(&base_name, &directory, &exists);

        let image_dir = image_dir_for(&self.target_root, &directory);
        let content = match converter.convert(FileSource::Bytes(&file.bytes), filename, &image_dir) {
            Ok(content) => content,
            Err(err) => {
                self.observer.notify(IngestEvent::FileFailed {
                    relative_path: file.relative_path.clone(),
                    kind: err.kind,
                    message: err.message.clone(),
                });
                return UploadResponse::failure(format!("Failed to convert {filename}: {err}"));
            }
        };

        let page = PageCandidate::new(resolved, directory, content);
        let message = format!("Created from uploaded file: {filename}");
        if let Err(message) = self.commit(&page, &message) {
            return UploadResponse::failure(message);
        }
        UploadResponse {
            success: true,
            message: format!("Created page '{}' from {filename}", page.full_name()),
            created_pages: vec![self.created_page(&file.relative_path, &page)],
        }
    }

    fn handle_folder(&self, files: &[UploadedFile], label: &str) -> UploadResponse {
        let batch = match self.ingestor.ingest(files, &self.target_root, label) {
            Ok(batch) => batch,
            Err(err) => return UploadResponse::failure(format!("Folder upload failed: {err}")),
        };

        let created_pages: Vec<CreatedPage> = batch
            .entries()
            .iter()
            .filter_map(|entry| {
                let message = format!("Created from folder upload: {}", entry.relative_path);
                self.commit(&entry.page, &message)
                    .ok()
                    .map(|()| self.created_page(&entry.relative_path, &entry.page))
            })
            .collect();

        UploadResponse {
            success: true,
            message: batch.summary_with_stored(created_pages.len()),
            created_pages,
        }
    }

    /// Stores the page; failures are reported to the observer and returned
    /// as a message.
    fn commit(&self, page: &PageCandidate, message: &str) -> Result<(), String> {
        let target = page_filename(page.full_name());
        match self
            .ingestor
            .store()
            .store(&target, page.content(), message, &self.author)
        {
            Ok(()) => {
                self.observer.notify(IngestEvent::PageStored {
                    full_name: page.full_name().to_string(),
                    message: message.to_string(),
                    author: self.author.clone(),
                });
                Ok(())
            }
            Err(err) => {
                let failure = format!("Failed to store {}: {err}", page.full_name());
                self.observer.notify(IngestEvent::StoreFailed {
                    full_name: page.full_name().to_string(),
                    message: err.to_string(),
                });
                Err(failure)
            }
        }
    }

    fn created_page(&self, relative_path: &str, page: &PageCandidate) -> CreatedPage {
        CreatedPage {
            relative_path: relative_path.to_string(),
            page_name: page.base_name().to_string(),
            full_page_name: page.full_name().to_string(),
            content: page.content().to_string(),
            page_directory: image_dir_for(&self.target_root, page.directory()),
        }
    }
}

/// `a/b/Name` becomes (`a/b`, sanitized `Name`). Directory segments are kept as
/// given but may not climb out of the root.
fn split_explicit_name(explicit: &str, fallback: &str) -> Result<(String, String), FileError> {
    let normalized = normalize_relative_path(explicit)?.unwrap_or_default();
    let (directory, leaf) = match normalized.rsplit_once('/') {
        Some((directory, leaf)) => (directory.to_string(), leaf),
        None => (String::new(), normalized.as_str()),
    };
    Ok((directory, page_name_or_fallback(leaf, fallback)))
}
