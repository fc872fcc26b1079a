use super::backend::StorageBackend;
use crate::error::{HqError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Scratch directory for in-flight writes, inside the data root so the final
/// rename never crosses a filesystem boundary.
pub const SCRATCH_DIR: &str = ".tmp";

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(HqError::Io)?;
        }
        Ok(())
    }

    fn scratch_path(&self, target: &Path) -> PathBuf {
        let stem = target
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("doc");
        self.root
            .join(SCRATCH_DIR)
            .join(format!("{}-{}.tmp", stem, Uuid::new_v4()))
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        match fs::read_to_string(self.root.join(path)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(HqError::Io(e)),
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            self.ensure_dir(parent)?;
        }
        self.ensure_dir(&self.root.join(SCRATCH_DIR))?;

        // Atomic Write
        let tmp_path = self.scratch_path(&target);
        fs::write(&tmp_path, content).map_err(HqError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, &target) {
            let _ = fs::remove_file(&tmp_path);
            return Err(HqError::Io(e));
        }

        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<()> {
        match fs::remove_file(self.root.join(path)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HqError::Io(e)),
        }
    }

    fn list(&self, dir: &Path) -> Result<Vec<String>> {
        let dir = self.root.join(dir);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).map_err(HqError::Io)? {
            let entry = entry.map_err(HqError::Io)?;
            let path = entry.path();
            if path.is_file() {
                if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn location(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}
