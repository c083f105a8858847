use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("document directory missing or not writable: {0}")]
    DocumentDir(String),
    #[error("document already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the document directory exists; create it if missing.
pub fn ensure_document_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::DocumentDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::DocumentDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::DocumentDir(e.to_string()))?;
    }
    Ok(())
}

/// Directory of assembled documents, one file per message.
///
/// Documents are written once: a temp file is filled and synced, then moved
/// into place without replacing an existing file.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.path_of(filename).exists()
    }

    pub fn create(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_document_dir(&self.dir)?;

        let target = self.path_of(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        match tmp.persist_noclobber(&target) {
            Ok(_) => Ok(target),
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                Err(PersistError::AlreadyExists(target))
            }
            Err(err) => Err(PersistError::Io(err.error)),
        }
    }
}
