use crate::api::HqApi;
use crate::config::Limits;
use crate::store::fs_backend::FsBackend;
use std::path::PathBuf;
use tempfile::TempDir;

/// A throwaway data directory with an API on top of it.
pub struct TestEnv {
    // Dropping the TempDir deletes the directory, so it lives as long as the env.
    pub _temp_dir: TempDir,
    pub api: HqApi<FsBackend>,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let api = HqApi::with_backend(FsBackend::new(root.clone()), limits)
            .expect("document registry is consistent");
        Self {
            _temp_dir: temp_dir,
            api,
            root,
        }
    }
}
