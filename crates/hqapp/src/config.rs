//! # Configuration
//!
//! HQ configuration is managed by [`confique`], layered in priority order:
//! 1. **Environment variables**: `HQ_DATA_DIR`, `HQ_DONE_CAP`, `TELEGRAM_BOT_TOKEN`, etc.
//! 2. **Config file**: `hq.toml` in the OS-appropriate config directory (via `directories`).
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `data_dir` | `HQ_DATA_DIR` | *(required)* | Directory holding every JSON document |
//! | `draft_backup_cap` | `HQ_DRAFT_BACKUP_CAP` | `10` | Backups kept per (piece, format) |
//! | `done_cap` | `HQ_DONE_CAP` | `6` | Cards kept in the kanban "done" column |
//! | `published_cap` | `HQ_PUBLISHED_CAP` | `6` | Published pieces kept in the pipeline |
//! | `memory_window_days` | `HQ_MEMORY_WINDOW_DAYS` | `90` | Memory log recent window, at most 3660 |
//! | `telegram_bot_token` | `TELEGRAM_BOT_TOKEN` | none | Bot token for agenda delivery |
//! | `telegram_chat_id` | `TELEGRAM_CHAT_ID` | none | Chat receiving the agenda |
//!
//! A missing `data_dir` is a configuration error: nothing in HQ can run
//! without a storage location, so it surfaces before any store is built.

use crate::error::{HqError, Result};
use crate::policy::retention::MAX_WINDOW_DAYS;
use confique::Config;
use directories::ProjectDirs;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "hq.toml";

/// Configuration for HQ, stored in `hq.toml`.
#[derive(Config, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct HqConfig {
    /// Directory holding the JSON documents, `docs/` and `drafts/`.
    #[config(env = "HQ_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Backups retained per (piece, format) draft.
    #[config(env = "HQ_DRAFT_BACKUP_CAP", default = 10)]
    pub draft_backup_cap: usize,

    /// Live cards kept in the kanban "done" column before auto-archival.
    #[config(env = "HQ_DONE_CAP", default = 6)]
    pub done_cap: usize,

    /// Published pieces kept in the content pipeline before auto-archival.
    #[config(env = "HQ_PUBLISHED_CAP", default = 6)]
    pub published_cap: usize,

    /// Size of the memory log recent window, in days.
    #[config(env = "HQ_MEMORY_WINDOW_DAYS", default = 90)]
    pub memory_window_days: u32,

    #[config(env = "TELEGRAM_BOT_TOKEN")]
    pub telegram_bot_token: Option<String>,

    #[config(env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,
}

/// The caps and windows the policy layer needs, detached from where data lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub draft_backup_cap: usize,
    pub done_cap: usize,
    pub published_cap: usize,
    pub memory_window_days: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            draft_backup_cap: 10,
            done_cap: 6,
            published_cap: 6,
            memory_window_days: 90,
        }
    }
}

impl HqConfig {
    /// Load from environment, then `hq.toml` in the user config dir.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path().as_deref())
    }

    /// Load from environment, then the given file (if any).
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut builder = Self::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        let mut config: Self = builder.load().map_err(|e| HqError::Config(e.to_string()))?;
        config.memory_window_days = config.memory_window_days.min(MAX_WINDOW_DAYS);
        Ok(config)
    }

    /// Build a config for a known data directory, defaults everywhere else.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let limits = Limits::default();
        Self {
            data_dir: data_dir.into(),
            draft_backup_cap: limits.draft_backup_cap,
            done_cap: limits.done_cap,
            published_cap: limits.published_cap,
            memory_window_days: limits.memory_window_days,
            telegram_bot_token: None,
            telegram_chat_id: None,
        }
    }

    pub fn limits(&self) -> Limits {
        Limits {
            draft_backup_cap: self.draft_backup_cap,
            done_cap: self.done_cap,
            published_cap: self.published_cap,
            memory_window_days: self.memory_window_days,
        }
    }

    /// Both Telegram settings, or `None` when either is missing.
    pub fn telegram(&self) -> Option<(&str, &str)> {
        match (&self.telegram_bot_token, &self.telegram_chat_id) {
            (Some(token), Some(chat)) if !token.is_empty() && !chat.is_empty() => {
                Some((token.as_str(), chat.as_str()))
            }
            _ => None,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "hq").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_with_data_dir_uses_defaults() {
        let config = HqConfig::with_data_dir("/tmp/hq");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/hq"));
        assert_eq!(config.limits(), Limits::default());
        assert!(config.telegram().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "data_dir = \"/srv/hq\"\ndone_cap = 3\ntelegram_bot_token = \"t\"\ntelegram_chat_id = \"c\"\n",
        )
        .unwrap();

        let config = HqConfig::load_from(Some(&path)).unwrap();
        if std::env::var_os("HQ_DATA_DIR").is_none() {
            assert_eq!(config.data_dir, PathBuf::from("/srv/hq"));
        }
        assert_eq!(config.done_cap, 3);
        assert_eq!(config.published_cap, 6);
        assert_eq!(config.draft_backup_cap, 10);
        assert_eq!(config.telegram(), Some(("t", "c")));
    }

    #[test]
    fn test_memory_window_is_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "data_dir = \"/srv/hq\"\nmemory_window_days = 4000000000\n",
        )
        .unwrap();

        if std::env::var_os("HQ_MEMORY_WINDOW_DAYS").is_none() {
            let config = HqConfig::load_from(Some(&path)).unwrap();
            assert_eq!(config.limits().memory_window_days, MAX_WINDOW_DAYS);
        }
    }

    #[test]
    fn test_missing_data_dir_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "done_cap = 3\n").unwrap();

        // Only meaningful when the environment does not provide one.
        if std::env::var_os("HQ_DATA_DIR").is_none() {
            let err = HqConfig::load_from(Some(&path)).unwrap_err();
            assert!(matches!(err, HqError::Config(_)));
        }
    }

    #[test]
    fn test_telegram_requires_both_settings() {
        let mut config = HqConfig::with_data_dir("/tmp/hq");
        config.telegram_bot_token = Some("token".into());
        assert!(config.telegram().is_none());
        config.telegram_chat_id = Some(String::new());
        assert!(config.telegram().is_none());
    }
}
