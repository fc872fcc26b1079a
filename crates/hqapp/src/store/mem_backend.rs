use super::backend::StorageBackend;
use crate::error::{HqError, Result};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// In-memory storage backend for testing.
///
/// Uses a `parking_lot::Mutex` rather than `RefCell` so the backend satisfies
/// the `Send + Sync` bound the document store needs for its per-name locks.
#[derive(Default)]
pub struct MemBackend {
    files: Mutex<BTreeMap<PathBuf, String>>,
    simulate_write_error: AtomicBool,
    writes: AtomicUsize,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Test helper to place raw content without going through a store.
    pub fn insert_raw(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.lock().insert(path.into(), content.into());
    }
}

impl StorageBackend for MemBackend {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.files.lock().get(path).cloned())
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(HqError::Store("Simulated write error".to_string()));
        }
        self.files
            .lock()
            .insert(path.to_path_buf(), content.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        self.files.lock().remove(path);
        Ok(())
    }

    fn list(&self, dir: &Path) -> Result<Vec<String>> {
        let files = self.files.lock();
        Ok(files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .filter_map(|p| p.file_name().and_then(|s| s.to_str()).map(String::from))
            .collect())
    }

    fn location(&self, path: &Path) -> PathBuf {
        PathBuf::from(format!("memory://{}", path.display()))
    }
}
