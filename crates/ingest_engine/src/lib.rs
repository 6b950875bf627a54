//! Ingest engine: upload conversion, image relocation and page naming.
mod decode;
mod dispatch;
mod engine;
mod extract;
mod filename;
mod format;
mod html;
mod images;
mod ingest;
mod observer;
mod persist;
mod preview;
mod resolve;
mod settings;
mod store;
mod table;
mod text;
mod types;
mod upload;

pub use decode::{decode_html, decode_utf8_text, DecodeError, DecodedHtml};
pub use dispatch::{FileSource, SingleFileConverter};
pub use engine::{ConversionEngine, EngineCapability, EngineError, EngineOutput};
pub use extract::{lift_inline_images, ExtractedContent, Extractor, ReadabilityLikeExtractor};
pub use filename::{
    file_stem, join_page_name, page_directory, page_name_or_fallback, sanitize_page_name,
    FALLBACK_PAGE_NAME,
};
pub use format::{extension_of, FormatClass, SOURCE_EXTENSIONS, SUPPORTED_EXTENSIONS};
pub use html::HtmlEngine;
pub use images::{image_extension, ImageRelocator};
pub use ingest::{
    BatchEntry, BatchResult, FailedFile, FolderIngestor, IngestError, SkipReason, SkippedFile,
};
pub use observer::{IngestEvent, IngestObserver, LogObserver, NullObserver};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use preview::{content_preview, MAX_PREVIEW_CHARS};
pub use resolve::{timestamp_now, Clock, NameResolver, MAX_SUFFIX_ATTEMPTS};
pub use settings::IngestSettings;
pub use store::{page_filename, FsPageStore, MemoryPageStore, PageStore, StoreError, StoredPage};
pub use table::csv_to_markdown;
pub use text::{json_to_markdown, looks_like_code, markdown_passthrough, plain_text_to_markdown};
pub use types::{
    ConversionResult, ErrorKind, ExtractedImage, FileError, PageCandidate, UploadedFile,
};
pub use upload::{CreatedPage, UploadRequest, UploadResponse, UploadService};
