use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::engine::EngineCapability;
use crate::format::{extension_of, FormatClass};
use crate::images::ImageRelocator;
use crate::observer::IngestObserver;
use crate::table::csv_to_markdown;
use crate::text::{
    json_to_markdown, leading_heading_level, markdown_passthrough, plain_text_to_markdown,
    source_to_markdown,
};
use crate::types::{ConversionResult, ErrorKind, FileError};

/// Where the converter reads a file from.
#[derive(Debug, Clone, Copy)]
pub enum FileSource<'a> {
    Bytes(&'a [u8]),
    /// Already materialized on disk; handed to the engine as is.
    Path(&'a Path),
}

impl<'a> FileSource<'a> {
    fn read(&self) -> Result<Cow<'a, [u8]>, FileError> {
        match *self {
            FileSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            FileSource::Path(path) => fs::read(path).map(Cow::Owned).map_err(|err| {
                FileError::new(
                    ErrorKind::Write,
                    format!("cannot read scratch file {}: {err}", path.display()),
                )
            }),
        }
    }
}

/// Turns one file into Markdown, choosing the handler by extension.
pub struct SingleFileConverter {
    engine: EngineCapability,
    relocator: ImageRelocator,
    include_source_files: bool,
}

impl SingleFileConverter {
    pub fn new(engine: EngineCapability, observer: Arc<dyn IngestObserver>) -> Self {
        Self {
            engine,
            relocator: ImageRelocator::new(observer),
            include_source_files: false,
        }
    }

    pub fn with_source_files(mut self, enabled: bool) -> Self {
        self.include_source_files = enabled;
        self
    }

    pub fn is_supported(&self, filename: &str) -> bool {
        FormatClass::from_filename(filename, self.include_source_files).is_some()
    }

    /// `image_dir` receives any images the engine extracts. Empty or
    /// whitespace-only output is a conversion failure.
    pub fn convert(
        &self,
        source: FileSource<'_>,
        filename: &str,
        image_dir: &Path,
    ) -> ConversionResult {
        let extension = extension_of(filename).unwrap_or_default();
        let Some(class) = FormatClass::from_extension(&extension, self.include_source_files)
        else {
            return Err(FileError::new(
                ErrorKind::UnsupportedFormat,
                format!("unsupported file format '{extension}' for {filename}"),
            ));
        };

        let markdown = match class {
            FormatClass::Document => self.convert_document(source, filename, &extension, image_dir),
            FormatClass::Markdown => markdown_passthrough(&source.read()?),
            FormatClass::PlainText => plain_text_to_markdown(&source.read()?),
            FormatClass::Csv => csv_to_markdown(&source.read()?),
            FormatClass::Json => json_to_markdown(&source.read()?),
            FormatClass::Source(language) => {
                source_to_markdown(&source.read()?, language, filename)
            }
        }?;

        if markdown.trim().is_empty() {
            return Err(FileError::new(
                ErrorKind::Conversion,
                format!("no content produced from {filename}"),
            ));
        }
        Ok(markdown)
    }

    fn convert_document(
        &self,
        source: FileSource<'_>,
        filename: &str,
        extension: &str,
        image_dir: &Path,
    ) -> ConversionResult {
        let Some(engine) = self.engine.for_extension(extension) else {
            return Err(FileError::new(
                ErrorKind::EngineUnavailable,
                format!("no conversion engine available for {extension} ({filename})"),
            ));
        };

        let output = match source {
            FileSource::Path(path) => engine.convert(path),
            FileSource::Bytes(bytes) => {
                // Engines work on paths; keep the extension so they can sniff the format.
                let mut tmp = tempfile::Builder::new()
                    .prefix("ingest-")
                    .suffix(extension)
                    .tempfile()
                    .map_err(|err| FileError::new(ErrorKind::Write, err.to_string()))?;
                tmp.write_all(bytes)
                    .and_then(|_| tmp.flush())
                    .map_err(|err| FileError::new(ErrorKind::Write, err.to_string()))?;
                engine.convert(tmp.path())
            }
        }
        .map_err(|err| {
            FileError::new(
                ErrorKind::Conversion,
                format!("{} engine failed on {filename}: {err}", engine.name()),
            )
        })?;

        let markdown =
            self.relocator
                .relocate(&output.markdown, &output.images, image_dir, filename);
        Ok(with_title_heading(markdown, filename))
    }
}

fn with_title_heading(markdown: String, filename: &str) -> String {
    if leading_heading_level(&markdown) == Some(1) {
        return markdown;
    }
    let leaf = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    format!("# {leaf}\n\n{markdown}")
}
