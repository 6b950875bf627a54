use std::path::PathBuf;

use ingest_logging::{ingest_debug, ingest_error, ingest_info, ingest_warn};

use crate::types::ErrorKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestEvent {
    FileMaterialized {
        relative_path: String,
        bytes: u64,
    },
    FileSkipped {
        relative_path: String,
        reason: String,
    },
    FileFailed {
        relative_path: String,
        kind: ErrorKind,
        message: String,
    },
    PageResolved {
        relative_path: String,
        full_name: String,
    },
    ImageWritten {
        path: PathBuf,
    },
    ImageFailed {
        index: usize,
        path: PathBuf,
        message: String,
    },
    NamingExhausted {
        directory: String,
        base_name: String,
        fallback: String,
    },
    PageStored {
        full_name: String,
        message: String,
        author: String,
    },
    StoreFailed {
        full_name: String,
        message: String,
    },
    BatchCompleted {
        label: String,
        created: usize,
        skipped: usize,
        failed: usize,
    },
}

/// Receives pipeline events. Passed to each component at construction.
pub trait IngestObserver: Send + Sync {
    fn notify(&self, event: IngestEvent);
}

/// Forwards events to the workspace logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl IngestObserver for LogObserver {
    fn notify(&self, event: IngestEvent) {
        match event {
            IngestEvent::FileMaterialized {
                relative_path,
                bytes,
            } => ingest_debug!("Materialized {} ({} bytes)", relative_path, bytes),
            IngestEvent::FileSkipped {
                relative_path,
                reason,
            } => ingest_info!("Skipped {}: {}", relative_path, reason),
            IngestEvent::FileFailed {
                relative_path,
                kind,
                message,
            } => ingest_warn!("Failed {} ({}): {}", relative_path, kind, message),
            IngestEvent::PageResolved {
                relative_path,
                full_name,
            } => ingest_info!("Page {} from {}", full_name, relative_path),
            IngestEvent::ImageWritten { path } => ingest_debug!("Wrote image {:?}", path),
            IngestEvent::ImageFailed {
                index,
                path,
                message,
            } => ingest_warn!("Image {} could not be written to {:?}: {}", index, path, message),
            IngestEvent::NamingExhausted {
                directory,
                base_name,
                fallback,
            } => ingest_warn!(
                "Suffix budget exhausted for {:?} in {:?}; using {}",
                base_name,
                directory,
                fallback
            ),
            IngestEvent::PageStored {
                full_name,
                message,
                author,
            } => ingest_info!("Stored {} by {}: {}", full_name, author, message),
            IngestEvent::StoreFailed { full_name, message } => {
                ingest_error!("Failed to store {}: {}", full_name, message)
            }
            IngestEvent::BatchCompleted {
                label,
                created,
                skipped,
                failed,
            } => ingest_info!(
                "Batch {:?} done: created={} skipped={} failed={}",
                label,
                created,
                skipped,
                failed
            ),
        }
    }
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl IngestObserver for NullObserver {
    fn notify(&self, _event: IngestEvent) {}
}
