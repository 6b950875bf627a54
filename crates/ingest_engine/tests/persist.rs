use std::fs;

use ingest_engine::{ensure_output_dir, AtomicFileWriter, FsPageStore, PageStore, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("pages").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn output_dir_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("plain");
    fs::write(&file_path, "x").unwrap();
    assert!(matches!(
        ensure_output_dir(&file_path),
        Err(PersistError::OutputDir(_))
    ));
}

#[test]
fn atomic_write_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("page.md", "hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "page.md");
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = writer.write_bytes("page.md", b"world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn names_with_path_components_are_refused() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());
    for name in ["a/b.md", "..", "../up.md", ""] {
        assert!(
            matches!(writer.write(name, "x"), Err(PersistError::InvalidName(_))),
            "{name:?}"
        );
    }
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    assert!(writer.write("page.md", "data").is_err());
    assert!(!file_path.with_file_name("page.md").exists());
}

#[test]
fn fs_store_writes_nested_pages_and_reports_existence() {
    let temp = TempDir::new().unwrap();
    let store = FsPageStore::new(temp.path().to_path_buf());
    assert!(!store.exists("docs/guide"));

    store
        .store("docs/guide.md", "# Guide", "Created from uploaded file: guide.md", "dave")
        .unwrap();

    assert!(store.exists("docs/guide"));
    assert_eq!(
        fs::read_to_string(temp.path().join("docs").join("guide.md")).unwrap(),
        "# Guide"
    );
    assert!(store.store("../escape.md", "x", "m", "a").is_err());
    assert!(store.store("docs//guide.md", "x", "m", "a").is_err());
}
