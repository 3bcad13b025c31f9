use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::io::lock::{DocumentLock, LockError};

/// Error type for document I/O
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Where the task document lives when no path is given:
/// `$XDG_DATA_HOME/tickle/tasks.txt`, falling back to `~/.local/share`.
pub fn default_document_path() -> PathBuf {
    data_dir().join("tasks.txt")
}

/// Per-user data directory for tickle
pub fn data_dir() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("share"));
    base.join("tickle")
}

pub(crate) fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the document text. A missing file yields `initial_text`, so a new
/// document starts with the placeholder instead of failing.
pub fn load_document(path: &Path, initial_text: &str) -> Result<String, DocumentError> {
    match fs::read_to_string(path) {
        Ok(text) => {
            tracing::debug!(path = %path.display(), bytes = text.len(), "loaded document");
            Ok(text)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no document yet, starting fresh");
            Ok(initial_text.to_string())
        }
        Err(e) => Err(DocumentError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Write the document text under the advisory lock, atomically.
pub fn save_document(path: &Path, text: &str) -> Result<(), DocumentError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| DocumentError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    let _lock = DocumentLock::for_save(path)?;
    atomic_write(path, text.as_bytes()).map_err(|e| DocumentError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "saved document");
    Ok(())
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
