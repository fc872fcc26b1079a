//! Docs registry and the markdown files it describes.
//!
//! Files live flat under `docs/`. Every file name coming from a caller is
//! reduced to its base name first, so registry entries can never point
//! outside that directory.

use super::apply;
use crate::error::{HqError, Result};
use crate::model::docs::{DocEntry, DocsDocument, DEFAULT_DOC_CATEGORY};
use crate::model::new_id;
use crate::store::backend::StorageBackend;
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DOCS_DIR: &str = "docs";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewDoc {
    pub filename: String,
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: String,
    /// Written to `docs/<filename>` when present and non-empty.
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocPatch {
    pub filename: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    /// Rewrites the file (under the patched or current name) when non-empty.
    pub content: Option<String>,
}

fn visible(name: &str) -> bool {
    !name.starts_with('.') && !name.contains(".sync-conflict-")
}

/// The base name of `raw`, or `None` if nothing usable is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    Path::new(raw.trim())
        .file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.starts_with('.'))
        .map(str::to_string)
}

fn require_filename(raw: &str) -> Result<String> {
    sanitize_filename(raw).ok_or_else(|| HqError::Api(format!("Invalid doc filename '{}'", raw)))
}

fn doc_path(name: &str) -> PathBuf {
    Path::new(DOCS_DIR).join(name)
}

pub fn registry<S: DocumentStore>(store: &S) -> DocsDocument {
    store.read()
}

/// File names under `docs/`, sorted, hiding dot-files and sync conflicts.
pub fn list_files<B: StorageBackend>(files: &B) -> Result<Vec<String>> {
    Ok(files
        .list(Path::new(DOCS_DIR))?
        .into_iter()
        .filter(|name| visible(name))
        .collect())
}

/// Content of `docs/<filename>`; unknown or unusable names read as empty.
pub fn read_file<B: StorageBackend>(files: &B, filename: &str) -> Result<String> {
    let Some(name) = sanitize_filename(filename) else {
        return Ok(String::new());
    };
    Ok(files.read(&doc_path(&name))?.unwrap_or_default())
}

/// Register a doc, writing its file first when content is supplied.
pub fn register<S: DocumentStore, B: StorageBackend>(
    store: &S,
    files: &B,
    new: NewDoc,
    now: DateTime<Utc>,
) -> Result<DocsDocument> {
    let filename = require_filename(&new.filename)?;
    if let Some(content) = new.content.as_deref().filter(|c| !c.is_empty()) {
        files.write(&doc_path(&filename), content)?;
    }
    let entry = DocEntry {
        id: new_id(),
        title: new
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| filename.clone()),
        category: new
            .category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_DOC_CATEGORY.to_string()),
        description: new.description,
        filename,
        added_at: now.into(),
        last_modified: now.into(),
    };
    store.update(move |mut doc: DocsDocument| {
        doc.docs.push(entry);
        doc
    })
}

pub fn update<S: DocumentStore, B: StorageBackend>(
    store: &S,
    files: &B,
    id: &str,
    mut patch: DocPatch,
    now: DateTime<Utc>,
) -> Result<DocsDocument> {
    let renamed = match patch.filename.take() {
        Some(raw) => Some(require_filename(&raw)?),
        None => None,
    };
    if let Some(content) = patch.content.take().filter(|c| !c.is_empty()) {
        let current: DocsDocument = store.read();
        let target = renamed
            .clone()
            .or_else(|| current.docs.iter().find(|d| d.id == id).map(|d| d.filename.clone()));
        if let Some(name) = target {
            files.write(&doc_path(&name), &content)?;
        }
    }

    store.update(|mut doc: DocsDocument| {
        if let Some(entry) = doc.docs.iter_mut().find(|d| d.id == id) {
            apply(&mut entry.filename, renamed);
            apply(&mut entry.title, patch.title);
            apply(&mut entry.category, patch.category);
            apply(&mut entry.description, patch.description);
            entry.last_modified = now.into();
        }
        doc
    })
}

/// Drop a registry entry. The file itself is left in place.
pub fn delete<S: DocumentStore>(store: &S, id: &str) -> Result<DocsDocument> {
    store.update(|mut doc: DocsDocument| {
        doc.docs.retain(|d| d.id != id);
        doc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{make_store, t};

    #[test]
    fn register_writes_file_and_defaults() {
        let store = make_store();
        let doc = register(
            &store,
            store.backend(),
            NewDoc {
                filename: "strategy.md".into(),
                content: Some("# Plan".into()),
                ..Default::default()
            },
            t(0),
        )
        .unwrap();

        let entry = &doc.docs[0];
        assert_eq!(entry.title, "strategy.md");
        assert_eq!(entry.category, "strategy");
        assert_eq!(entry.added_at, t(0));
        assert_eq!(read_file(store.backend(), "strategy.md").unwrap(), "# Plan");
    }

    #[test]
    fn filenames_are_reduced_to_base_name() {
        let store = make_store();
        let doc = register(
            &store,
            store.backend(),
            NewDoc {
                filename: "../../etc/notes.md".into(),
                content: Some("x".into()),
                ..Default::default()
            },
            t(0),
        )
        .unwrap();
        assert_eq!(doc.docs[0].filename, "notes.md");
        assert_eq!(list_files(store.backend()).unwrap(), ["notes.md"]);

        let err = register(&store, store.backend(), NewDoc::default(), t(0)).unwrap_err();
        assert!(matches!(err, HqError::Api(_)));
    }

    #[test]
    fn listing_hides_dot_and_conflict_files() {
        let store = make_store();
        let files = store.backend();
        files.insert_raw("docs/a.md", "a");
        files.insert_raw("docs/.DS_Store", "");
        files.insert_raw("docs/a.sync-conflict-20250101-000000.md", "old");
        assert_eq!(list_files(files).unwrap(), ["a.md"]);
        assert_eq!(read_file(files, "missing.md").unwrap(), "");
    }

    #[test]
    fn update_rewrites_content_under_current_name() {
        let store = make_store();
        let doc = register(
            &store,
            store.backend(),
            NewDoc {
                filename: "plan.md".into(),
                content: Some("v1".into()),
                ..Default::default()
            },
            t(0),
        )
        .unwrap();
        let id = doc.docs[0].id.clone();

        let doc = update(
            &store,
            store.backend(),
            &id,
            DocPatch {
                description: Some("Q3".into()),
                content: Some("v2".into()),
                ..Default::default()
            },
            t(3),
        )
        .unwrap();
        assert_eq!(doc.docs[0].description, "Q3");
        assert_eq!(doc.docs[0].last_modified, t(3));
        assert_eq!(read_file(store.backend(), "plan.md").unwrap(), "v2");
    }

    #[test]
    fn delete_keeps_file() {
        let store = make_store();
        let doc = register(
            &store,
            store.backend(),
            NewDoc {
                filename: "keep.md".into(),
                content: Some("body".into()),
                ..Default::default()
            },
            t(0),
        )
        .unwrap();
        let doc = delete(&store, &doc.docs[0].id).unwrap();
        assert!(doc.docs.is_empty());
        assert_eq!(read_file(store.backend(), "keep.md").unwrap(), "body");
    }
}
