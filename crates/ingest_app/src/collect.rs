use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use ingest_engine::UploadedFile;
use walkdir::WalkDir;

/// Reads every regular file under `dir` the way a browser folder upload
/// presents them: forward-slash paths that start with the folder's own name.
/// Entries are sorted so batches are reproducible.
pub fn collect_folder(dir: &Path) -> Result<Vec<UploadedFile>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    let root_name = folder_name(dir);

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.with_context(|| format!("cannot walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(dir)
            .with_context(|| format!("{} is outside {}", entry.path().display(), dir.display()))?;
        let mut segments = vec![root_name.clone()];
        segments.extend(
            relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        );
        let bytes = fs::read(entry.path())
            .with_context(|| format!("cannot read {}", entry.path().display()))?;
        files.push(UploadedFile::new(segments.join("/"), bytes));
    }
    Ok(files)
}

/// Reads one file; its relative path is just the file name.
pub fn collect_file(path: &Path) -> Result<UploadedFile> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    let bytes = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(UploadedFile::new(name, bytes))
}

pub fn folder_name(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(dir)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

#[cfg(test)]
mod tests {
    use super::{collect_file, collect_folder};
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn folder_paths_include_the_folder_name() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().join("handbook");
        fs::create_dir_all(root.join("team")).unwrap();
        fs::write(root.join("intro.md"), "hi").unwrap();
        fs::write(root.join("team").join("people.csv"), "name").unwrap();

        let files = collect_folder(&root).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["handbook/intro.md", "handbook/team/people.csv"]);
        assert_eq!(files[0].bytes, b"hi");
    }

    #[test]
    fn single_file_uses_its_name() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "body").unwrap();
        let file = collect_file(&path).unwrap();
        assert_eq!(file.relative_path, "notes.txt");
    }

    #[test]
    fn non_directory_is_rejected() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(collect_folder(&temp.path().join("missing")).is_err());
    }
}
