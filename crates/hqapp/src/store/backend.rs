use crate::error::Result;
use std::path::{Path, PathBuf};

/// Abstract interface for raw storage I/O.
///
/// This trait handles the "how" of storage (filesystem vs memory), while
/// [`DocStore`](super::doc_store::DocStore) and
/// [`DraftStore`](crate::drafts::DraftStore) handle the "what" (defaults,
/// stamping, locking, backups).
///
/// Every path is relative to the backend's data root, e.g. `tasks.json`,
/// `drafts/abc-linkedin.md` or `drafts/backups`.
pub trait StorageBackend: Send + Sync {
    /// Read a text file.
    /// Returns Ok(None) if the file does not exist.
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn read(&self, path: &Path) -> Result<Option<String>>;

    /// Write a text file, creating parent directories as needed.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Delete a file. Deleting a missing file is not an error.
    fn remove(&self, path: &Path) -> Result<()>;

    /// List the file names directly inside `dir`, sorted.
    /// A missing directory lists as empty.
    fn list(&self, dir: &Path) -> Result<Vec<String>>;

    /// The location a path resolves to.
    /// For FsBackend, this is the real path. For MemBackend, a virtual path.
    fn location(&self, path: &Path) -> PathBuf;
}
