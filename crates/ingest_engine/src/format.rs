use std::path::Path;

/// Extensions every collaborator accepts.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    ".txt", ".text", ".md", ".markdown", ".csv", ".json", ".docx", ".doc", ".xlsx", ".xls",
    ".pptx", ".ppt", ".pdf", ".html", ".htm",
];

/// Optional superset: source and config files, with their fence language.
pub const SOURCE_EXTENSIONS: &[(&str, &str)] = &[
    (".rs", "rust"),
    (".py", "python"),
    (".js", "javascript"),
    (".ts", "typescript"),
    (".go", "go"),
    (".java", "java"),
    (".c", "c"),
    (".h", "c"),
    (".cpp", "cpp"),
    (".hpp", "cpp"),
    (".cs", "csharp"),
    (".rb", "ruby"),
    (".php", "php"),
    (".sh", "bash"),
    (".sql", "sql"),
    (".toml", "toml"),
    (".yaml", "yaml"),
    (".yml", "yaml"),
    (".ini", "ini"),
    (".xml", "xml"),
    (".css", "css"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatClass {
    Markdown,
    PlainText,
    Csv,
    Json,
    /// Binary or markup documents handed to the conversion engine.
    Document,
    /// Source file rendered as a fenced block in the given language.
    Source(&'static str),
}

impl FormatClass {
    /// `extension` is lower-case with its leading dot.
    pub fn from_extension(extension: &str, include_source: bool) -> Option<Self> {
        let class = match extension {
            ".md" | ".markdown" => FormatClass::Markdown,
            ".txt" | ".text" => FormatClass::PlainText,
            ".csv" => FormatClass::Csv,
            ".json" => FormatClass::Json,
            ".pdf" | ".doc" | ".docx" | ".xls" | ".xlsx" | ".ppt" | ".pptx" | ".html" | ".htm" => {
                FormatClass::Document
            }
            _ if include_source => {
                let language = SOURCE_EXTENSIONS
                    .iter()
                    .find(|(ext, _)| *ext == extension)
                    .map(|(_, language)| *language)?;
                FormatClass::Source(language)
            }
            _ => return None,
        };
        Some(class)
    }

    pub fn from_filename(filename: &str, include_source: bool) -> Option<Self> {
        extension_of(filename).and_then(|ext| Self::from_extension(&ext, include_source))
    }
}

/// Lower-cased final extension including the dot, e.g. `.pdf`.
pub fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}
