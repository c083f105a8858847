use std::fs;

use clipper_engine::{ensure_document_dir, DocumentStore, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_document_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("notes").join("line");
    assert!(!new_dir.exists());
    ensure_document_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn document_dir_must_be_a_directory() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let err = ensure_document_dir(&file_path).unwrap_err();
    assert!(matches!(err, PersistError::DocumentDir(_)));
}

#[test]
fn create_writes_once_and_never_clobbers() {
    let temp = TempDir::new().unwrap();
    let store = DocumentStore::new(temp.path());
    assert!(!store.contains("doc.md"));

    let first = store.create("doc.md", "hello").unwrap();
    assert_eq!(first.file_name().unwrap(), "doc.md");
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");
    assert!(store.contains("doc.md"));

    let err = store.create("doc.md", "world").unwrap_err();
    assert!(matches!(err, PersistError::AlreadyExists(path) if path == first));
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let store = DocumentStore::new(file_path.clone());
    assert!(store.create("doc.md", "data").is_err());
    assert!(!file_path.with_file_name("doc.md").exists());
}
