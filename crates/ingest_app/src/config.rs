use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILENAME: &str = "ingest.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogDestination {
    #[default]
    Terminal,
    File,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub author: String,
    pub log_destination: LogDestination,
    pub log_level: LogLevel,
    pub include_source_files: bool,
    /// Parent of the per-batch scratch directory.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            author: "wiki-ingest".to_string(),
            log_destination: LogDestination::default(),
            log_level: LogLevel::default(),
            include_source_files: false,
            scratch_dir: None,
        }
    }
}

impl AppConfig {
    /// An explicit path must exist. Without one, `./ingest.ron` is read when
    /// present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => match Self::read(Path::new(DEFAULT_CONFIG_FILENAME)) {
                Ok(config) => Ok(config),
                Err(err) if is_not_found(&err) => Ok(Self::default()),
                Err(err) => Err(err),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read config {}", path.display()))?;
        ron::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|io| io.kind() == io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, LogDestination, LogLevel};
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_take_defaults() {
        let config: AppConfig = ron::from_str("(author: \"erin\", log_destination: Both)").unwrap();
        assert_eq!(config.author, "erin");
        assert_eq!(config.log_destination, LogDestination::Both);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(!config.include_source_files);
        assert_eq!(config.scratch_dir, None);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(AppConfig::load(Some(dir.path().join("absent.ron").as_path())).is_err());
    }

    #[test]
    fn explicit_file_is_parsed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ingest.ron");
        std::fs::write(
            &path,
            "(author: \"frank\", log_level: Debug, include_source_files: true, scratch_dir: Some(\"/tmp/x\"))",
        )
        .unwrap();
        let config = AppConfig::load(Some(path.as_path())).unwrap();
        assert_eq!(config.author, "frank");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.include_source_files);
        assert_eq!(config.scratch_dir, Some("/tmp/x".into()));
    }
}
