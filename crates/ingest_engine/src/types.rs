use std::fmt;

use crate::filename::join_page_name;

/// One uploaded file. `relative_path` comes from the client and is untrusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub relative_path: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(relative_path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            relative_path: relative_path.into(),
            bytes: bytes.into(),
        }
    }
}

/// Image bytes pulled out of a document by a conversion engine.
///
/// `format_hint` is either a MIME type (`image/png`) or a bare format name (`png`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    pub index: usize,
    pub format_hint: Option<String>,
    pub data: Vec<u8>,
}

/// A converted page with its resolved name. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCandidate {
    base_name: String,
    directory: String,
    full_name: String,
    content: String,
}

impl PageCandidate {
    pub fn new(
        base_name: impl Into<String>,
        directory: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let base_name = base_name.into();
        let directory = directory.into();
        let full_name = join_page_name(&directory, &base_name);
        Self {
            base_name,
            directory,
            full_name,
            content: content.into(),
        }
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Text input was not valid UTF-8.
    Decode,
    /// Malformed CSV or JSON.
    Parse,
    EngineUnavailable,
    /// The engine ran but reported a failure.
    Conversion,
    UnsupportedFormat,
    /// Scratch or target filesystem failure.
    Write,
    /// The suffix budget ran out and a timestamp was used. Never fatal.
    NamingExhausted,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Decode => write!(f, "decode error"),
            ErrorKind::Parse => write!(f, "parse error"),
            ErrorKind::EngineUnavailable => write!(f, "conversion engine unavailable"),
            ErrorKind::Conversion => write!(f, "conversion error"),
            ErrorKind::UnsupportedFormat => write!(f, "unsupported format"),
            ErrorKind::Write => write!(f, "write error"),
            ErrorKind::NamingExhausted => write!(f, "naming exhausted"),
        }
    }
}

/// Per-file failure: a kind for callers to match on plus a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FileError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FileError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Markdown on success; never partially populated.
pub type ConversionResult = Result<String, FileError>;
