use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

/// File a page is stored under.
pub fn page_filename(full_name: &str) -> String {
    format!("{full_name}.md")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid page file {0:?}")]
    InvalidTarget(String),
    #[error("write failed for {target}: {source}")]
    Write {
        target: String,
        #[source]
        source: PersistError,
    },
}

/// The content store pages are committed to.
pub trait PageStore: Send + Sync {
    fn exists(&self, full_name: &str) -> bool;

    /// Failures surface to the caller and are not retried.
    fn store(
        &self,
        target_file: &str,
        content: &str,
        message: &str,
        author: &str,
    ) -> Result<(), StoreError>;
}

/// Pages as Markdown files under a root directory.
#[derive(Debug, Clone)]
pub struct FsPageStore {
    root: PathBuf,
}

impl FsPageStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PageStore for FsPageStore {
    fn exists(&self, full_name: &str) -> bool {
        match split_target(&page_filename(full_name)) {
            Some((dirs, leaf)) => dirs
                .iter()
                .fold(self.root.clone(), |dir, segment| dir.join(segment))
                .join(leaf)
                .is_file(),
            None => false,
        }
    }

    fn store(
        &self,
        target_file: &str,
        content: &str,
        _message: &str,
        _author: &str,
    ) -> Result<(), StoreError> {
        let (dirs, leaf) = split_target(target_file)
            .ok_or_else(|| StoreError::InvalidTarget(target_file.to_string()))?;
        let dir = dirs
            .iter()
            .fold(self.root.clone(), |dir, segment| dir.join(segment));
        AtomicFileWriter::new(dir)
            .write(leaf, content)
            .map_err(|source| StoreError::Write {
                target: target_file.to_string(),
                source,
            })?;
        Ok(())
    }
}

/// Splits `a/b/c.md` into directories and leaf; rejects empty, `.` and `..` segments.
fn split_target(target: &str) -> Option<(Vec<&str>, &str)> {
    let segments: Vec<&str> = target.split('/').collect();
    if segments
        .iter()
        .any(|s| s.is_empty() || *s == "." || *s == "..")
    {
        return None;
    }
    let (leaf, dirs) = segments.split_last()?;
    Some((dirs.to_vec(), *leaf))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPage {
    pub content: String,
    pub message: String,
    pub author: String,
}

/// In-memory store keyed by target file.
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    pages: Mutex<BTreeMap<String, StoredPage>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with empty pages of the given names.
    pub fn with_pages<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let pages = names
            .into_iter()
            .map(|name| {
                (
                    page_filename(name),
                    StoredPage {
                        content: String::new(),
                        message: "seed".to_string(),
                        author: "seed".to_string(),
                    },
                )
            })
            .collect();
        Self {
            pages: Mutex::new(pages),
        }
    }

    pub fn get(&self, target_file: &str) -> Option<StoredPage> {
        self.lock().get(target_file).cloned()
    }

    pub fn target_files(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, StoredPage>> {
        self.pages.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PageStore for MemoryPageStore {
    fn exists(&self, full_name: &str) -> bool {
        self.lock().contains_key(&page_filename(full_name))
    }

    fn store(
        &self,
        target_file: &str,
        content: &str,
        message: &str,
        author: &str,
    ) -> Result<(), StoreError> {
        if split_target(target_file).is_none() {
            return Err(StoreError::InvalidTarget(target_file.to_string()));
        }
        self.lock().insert(
            target_file.to_string(),
            StoredPage {
                content: content.to_string(),
                message: message.to_string(),
                author: author.to_string(),
            },
        );
        Ok(())
    }
}
