//! # Draft Versioning
//!
//! Long-form text for a content piece lives in one markdown file per
//! (piece, format) pair, outside the JSON documents:
//!
//! ```text
//! drafts/<piece>-<format>.md
//! drafts/backups/<piece>-<format>-<YYYY-MM-DDTHH-MM-SS>.md
//! ```
//!
//! Overwriting a draft first snapshots the previous text into `backups/`,
//! but only when that text is non-empty and differs from the new text once
//! surrounding whitespace is ignored. Backups are immutable; after each
//! snapshot the oldest are pruned until at most `cap` remain for the pair.
//!
//! The file name is the index. Timestamps are zero-padded, so lexicographic
//! order is chronological order and no manifest is kept. Files left behind by
//! a sync tool (`.sync-conflict-`) are never listed or pruned.

use crate::error::{HqError, Result};
use crate::store::backend::StorageBackend;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

pub const DRAFTS_DIR: &str = "drafts";
pub const BACKUPS_DIR: &str = "drafts/backups";

const STAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";
const SYNC_CONFLICT_MARKER: &str = ".sync-conflict-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftFormat {
    Research,
    Youtube,
    Linkedin,
    Twitter,
    Instagram,
    Email,
}

impl DraftFormat {
    pub const ALL: [DraftFormat; 6] = [
        DraftFormat::Research,
        DraftFormat::Youtube,
        DraftFormat::Linkedin,
        DraftFormat::Twitter,
        DraftFormat::Instagram,
        DraftFormat::Email,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DraftFormat::Research => "research",
            DraftFormat::Youtube => "youtube",
            DraftFormat::Linkedin => "linkedin",
            DraftFormat::Twitter => "twitter",
            DraftFormat::Instagram => "instagram",
            DraftFormat::Email => "email",
        }
    }
}

impl fmt::Display for DraftFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftFormat {
    type Err = HqError;

    fn from_str(s: &str) -> Result<Self> {
        DraftFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| HqError::Api(format!("Invalid draft format '{}'", s)))
    }
}

/// A backup as listed to callers. `saved_at` is recovered from the file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupInfo {
    pub filename: String,
    pub saved_at: DateTime<Utc>,
}

/// Reject piece ids that could escape the drafts directory.
pub fn validate_piece_id(piece_id: &str) -> Result<()> {
    if piece_id.is_empty()
        || piece_id.contains('/')
        || piece_id.contains('\\')
        || piece_id.contains("..")
    {
        return Err(HqError::Api(format!("Invalid piece id '{}'", piece_id)));
    }
    Ok(())
}

fn draft_path(piece_id: &str, format: DraftFormat) -> PathBuf {
    Path::new(DRAFTS_DIR).join(format!("{}-{}.md", piece_id, format))
}

fn backup_prefix(piece_id: &str, format: DraftFormat) -> String {
    format!("{}-{}-", piece_id, format)
}

/// The timestamp embedded in a backup name, if `name` belongs to `prefix`.
fn backup_stamp(name: &str, prefix: &str) -> Option<DateTime<Utc>> {
    if name.contains(SYNC_CONFLICT_MARKER) {
        return None;
    }
    let stamp = name.strip_prefix(prefix)?.strip_suffix(".md")?;
    NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Base name only, so `../../tasks.json` cannot leave the backups directory.
fn sanitize_file_name(name: &str) -> Option<&str> {
    Path::new(name)
        .file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.starts_with('.'))
}

pub struct DraftStore<B: StorageBackend> {
    backend: Arc<B>,
    cap: usize,
}

impl<B: StorageBackend> DraftStore<B> {
    pub fn new(backend: Arc<B>, cap: usize) -> Self {
        Self { backend, cap }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Current text, or an empty string when nothing has been written yet.
    pub fn read_draft(&self, piece_id: &str, format: DraftFormat) -> Result<String> {
        validate_piece_id(piece_id)?;
        Ok(self
            .backend
            .read(&draft_path(piece_id, format))?
            .unwrap_or_default())
    }

    pub fn write_draft_with_backup(
        &self,
        piece_id: &str,
        format: DraftFormat,
        text: &str,
    ) -> Result<()> {
        self.write_draft_with_backup_at(piece_id, format, text, Utc::now())
    }

    /// [`write_draft_with_backup`](Self::write_draft_with_backup) with an
    /// explicit clock, used to name the backup.
    pub fn write_draft_with_backup_at(
        &self,
        piece_id: &str,
        format: DraftFormat,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        validate_piece_id(piece_id)?;
        let current = self.read_draft(piece_id, format)?;

        if !current.is_empty() && current.trim() != text.trim() {
            let name = format!(
                "{}{}.md",
                backup_prefix(piece_id, format),
                now.format(STAMP_FORMAT)
            );
            self.backend
                .write(&Path::new(BACKUPS_DIR).join(&name), &current)?;
            debug!(backup = %name, "draft backup written");
            self.prune(piece_id, format)?;
        }

        self.backend.write(&draft_path(piece_id, format), text)
    }

    fn backup_names(&self, piece_id: &str, format: DraftFormat) -> Result<Vec<String>> {
        let prefix = backup_prefix(piece_id, format);
        let mut names: Vec<String> = self
            .backend
            .list(Path::new(BACKUPS_DIR))?
            .into_iter()
            .filter(|name| backup_stamp(name, &prefix).is_some())
            .collect();
        names.sort();
        Ok(names)
    }

    fn prune(&self, piece_id: &str, format: DraftFormat) -> Result<()> {
        let names = self.backup_names(piece_id, format)?;
        if names.len() <= self.cap {
            return Ok(());
        }
        let surplus = names.len() - self.cap;
        for name in &names[..surplus] {
            self.backend.remove(&Path::new(BACKUPS_DIR).join(name))?;
        }
        info!(piece = piece_id, %format, pruned = surplus, "draft backups pruned");
        Ok(())
    }

    /// Backups for the pair, newest first.
    pub fn list_backups(&self, piece_id: &str, format: DraftFormat) -> Result<Vec<BackupInfo>> {
        validate_piece_id(piece_id)?;
        let prefix = backup_prefix(piece_id, format);
        let mut backups: Vec<BackupInfo> = self
            .backup_names(piece_id, format)?
            .into_iter()
            .filter_map(|filename| {
                backup_stamp(&filename, &prefix).map(|saved_at| BackupInfo { filename, saved_at })
            })
            .collect();
        backups.reverse();
        Ok(backups)
    }

    /// Text of a backup. Unknown names read as an empty string.
    pub fn read_backup(&self, filename: &str) -> Result<String> {
        let Some(name) = sanitize_file_name(filename) else {
            return Ok(String::new());
        };
        Ok(self
            .backend
            .read(&Path::new(BACKUPS_DIR).join(name))?
            .unwrap_or_default())
    }
}
