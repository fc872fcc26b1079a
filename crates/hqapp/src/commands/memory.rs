//! Memory log commands.
//!
//! The recent window is applied only when asked: [`recent`] is a view and
//! [`archive_stale`] an explicit operation. Adding entries never archives.

use super::apply;
use crate::error::Result;
use crate::model::memory::{MemoryDocument, MemoryEntry, DEFAULT_AUTHOR, DEFAULT_ENTRY_TYPE};
use crate::model::{date_of, new_id};
use crate::policy::retention;
use crate::store::DocumentStore;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewEntry {
    pub date: Option<String>,
    pub author: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub related_to: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntryPatch {
    pub date: Option<String>,
    pub author: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub related_to: Option<String>,
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub fn log<S: DocumentStore>(store: &S) -> MemoryDocument {
    store.read()
}

pub fn add_entry<S: DocumentStore>(
    store: &S,
    new: NewEntry,
    now: DateTime<Utc>,
) -> Result<MemoryDocument> {
    let entry = MemoryEntry {
        id: new_id(),
        date: new
            .date
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| date_of(now)),
        author: or_default(new.author, DEFAULT_AUTHOR),
        entry_type: or_default(new.entry_type, DEFAULT_ENTRY_TYPE),
        title: new.title,
        content: new.content,
        tags: new.tags,
        related_to: new.related_to,
        created_at: now.into(),
    };
    store.update(move |mut doc: MemoryDocument| {
        doc.entries.push(entry);
        doc
    })
}

pub fn update_entry<S: DocumentStore>(
    store: &S,
    id: &str,
    patch: EntryPatch,
) -> Result<MemoryDocument> {
    store.update(|mut doc: MemoryDocument| {
        if let Some(entry) = doc.entries.iter_mut().find(|e| e.id == id) {
            apply(&mut entry.date, patch.date);
            apply(&mut entry.author, patch.author);
            apply(&mut entry.entry_type, patch.entry_type);
            apply(&mut entry.title, patch.title);
            apply(&mut entry.content, patch.content);
            apply(&mut entry.tags, patch.tags);
            if patch.related_to.is_some() {
                entry.related_to = patch.related_to;
            }
        }
        doc
    })
}

pub fn delete_entry<S: DocumentStore>(store: &S, id: &str) -> Result<MemoryDocument> {
    store.update(|mut doc: MemoryDocument| {
        doc.entries.retain(|e| e.id != id);
        doc
    })
}

/// Live entries dated inside the window, in log order.
pub fn recent<S: DocumentStore>(store: &S, window_days: u32, today: NaiveDate) -> Vec<MemoryEntry> {
    store
        .read::<MemoryDocument>()
        .entries
        .into_iter()
        .filter(|e| retention::in_window(e, today, window_days))
        .collect()
}

/// Move entries older than the window to the head of the archive.
pub fn archive_stale<S: DocumentStore>(
    store: &S,
    window_days: u32,
    today: NaiveDate,
) -> Result<MemoryDocument> {
    store.update(|mut doc: MemoryDocument| {
        let entries = std::mem::take(&mut doc.entries);
        let (keep, stale) = retention::partition(entries, today, window_days);
        doc.entries = keep;
        if !stale.is_empty() {
            tracing::info!(archived = stale.len(), window_days, "memory entries archived");
            doc.archive.splice(0..0, stale);
        }
        doc
    })
}

/// Entries per day over the last `days` days, oldest first.
pub fn activity<S: DocumentStore>(store: &S, days: u32, today: NaiveDate) -> Vec<(NaiveDate, usize)> {
    retention::activity(&store.read::<MemoryDocument>().entries, today, days)
}
