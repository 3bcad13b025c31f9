use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How long a save waits for another `tk` process before giving up
pub const SAVE_TIMEOUT: Duration = Duration::from_secs(5);

const RETRY_EVERY: Duration = Duration::from_millis(10);

/// Exclusive hold on a task document while it is being rewritten.
///
/// The editor's autosave and one-shot commands like `tk toggle` take this
/// before replacing the file, so two writers never interleave. The hold is a
/// `flock` on a hidden sibling file, released (and the file removed) on drop.
pub struct DocumentLock {
    _file: File,
    lock_file: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not open lock file {lock_file}: {source}")]
    Open {
        lock_file: PathBuf,
        source: std::io::Error,
    },
    #[error("{document} is being saved by another tickle process")]
    Busy { document: PathBuf },
}

/// Lock file for a document: `notes/.tasks.txt.lock` for `notes/tasks.txt`
pub fn lock_path(document: &Path) -> PathBuf {
    let name = document
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tasks".to_string());
    document
        .parent()
        .unwrap_or(Path::new("."))
        .join(format!(".{}.lock", name))
}

impl DocumentLock {
    /// Take the lock for `document`, retrying until `timeout` has passed.
    pub fn acquire(document: &Path, timeout: Duration) -> Result<Self, LockError> {
        let lock_file = lock_path(document);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_file)
            .map_err(|source| LockError::Open {
                lock_file: lock_file.clone(),
                source,
            })?;

        let deadline = Instant::now() + timeout;
        while !try_flock(&file) {
            if Instant::now() >= deadline {
                tracing::warn!(document = %document.display(), "document lock busy");
                return Err(LockError::Busy {
                    document: document.to_path_buf(),
                });
            }
            std::thread::sleep(RETRY_EVERY);
        }
        tracing::trace!(lock = %lock_file.display(), "document locked");
        Ok(DocumentLock {
            _file: file,
            lock_file,
        })
    }

    /// [`DocumentLock::acquire`] with [`SAVE_TIMEOUT`]
    pub fn for_save(document: &Path) -> Result<Self, LockError> {
        Self::acquire(document, SAVE_TIMEOUT)
    }
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        // the flock goes with the file handle
        let _ = fs::remove_file(&self.lock_file);
    }
}

#[cfg(unix)]
fn try_flock(file: &File) -> bool {
    use std::os::unix::io::AsRawFd;
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) == 0 }
}

#[cfg(not(unix))]
fn try_flock(_file: &File) -> bool {
    true
}
