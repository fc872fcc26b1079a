//! # Document Registry
//!
//! The typed table of every document HQ knows about: its logical name, the
//! file it lives in, and the default value a read falls back to.
//!
//! | Kind | File | Default |
//! |------|------|---------|
//! | `tasks` | `tasks.json` | no tasks |
//! | `kanban` | `kanban.json` | backlog / in-progress / review / done, four seed labels |
//! | `content-pipeline` | `content-pipeline.json` | empty pipeline, archive, angles |
//! | `ideas` | `ideas.json` | empty inbox, five seed tags |
//! | `memory-log` | `memory-log.json` | no entries |
//! | `agenda` | `agenda.json` | no entries |
//! | `analytics` | `analytics.json` | no platforms |
//! | `docs-registry` | `docs-registry.json` | no docs |
//! | `sprint` | `sprint.json` | no current sprint |
//! | `calendar-cache` | `calendar-cache.json` | no events, never fetched |
//!
//! [`verify`] checks the table at startup: names are unique, every default
//! serializes to a JSON object carrying `lastModified`, and every document
//! type points back at its own kind.

use super::agenda::AgendaDocument;
use super::analytics::AnalyticsDocument;
use super::calendar::CalendarCache;
use super::content::ContentDocument;
use super::docs::DocsDocument;
use super::ideas::IdeasDocument;
use super::kanban::KanbanDocument;
use super::memory::MemoryDocument;
use super::sprint::SprintDocument;
use super::tasks::TasksDocument;
use super::Document;
use crate::error::{HqError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Tasks,
    Kanban,
    ContentPipeline,
    Ideas,
    MemoryLog,
    Agenda,
    Analytics,
    DocsRegistry,
    Sprint,
    CalendarCache,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 10] = [
        DocumentKind::Tasks,
        DocumentKind::Kanban,
        DocumentKind::ContentPipeline,
        DocumentKind::Ideas,
        DocumentKind::MemoryLog,
        DocumentKind::Agenda,
        DocumentKind::Analytics,
        DocumentKind::DocsRegistry,
        DocumentKind::Sprint,
        DocumentKind::CalendarCache,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DocumentKind::Tasks => "tasks",
            DocumentKind::Kanban => "kanban",
            DocumentKind::ContentPipeline => "content-pipeline",
            DocumentKind::Ideas => "ideas",
            DocumentKind::MemoryLog => "memory-log",
            DocumentKind::Agenda => "agenda",
            DocumentKind::Analytics => "analytics",
            DocumentKind::DocsRegistry => "docs-registry",
            DocumentKind::Sprint => "sprint",
            DocumentKind::CalendarCache => "calendar-cache",
        }
    }

    /// Path of the backing file, relative to the data directory.
    pub fn file_path(self) -> PathBuf {
        PathBuf::from(format!("{}.json", self.name()))
    }

    /// The default document, as untyped JSON.
    pub fn default_value(self) -> Result<Value> {
        match self {
            DocumentKind::Tasks => default_of::<TasksDocument>(),
            DocumentKind::Kanban => default_of::<KanbanDocument>(),
            DocumentKind::ContentPipeline => default_of::<ContentDocument>(),
            DocumentKind::Ideas => default_of::<IdeasDocument>(),
            DocumentKind::MemoryLog => default_of::<MemoryDocument>(),
            DocumentKind::Agenda => default_of::<AgendaDocument>(),
            DocumentKind::Analytics => default_of::<AnalyticsDocument>(),
            DocumentKind::DocsRegistry => default_of::<DocsDocument>(),
            DocumentKind::Sprint => default_of::<SprintDocument>(),
            DocumentKind::CalendarCache => default_of::<CalendarCache>(),
        }
    }

    /// Parse raw file content as this kind's typed document and re-emit it
    /// normalized. `None` when the content does not parse.
    pub fn normalize_value(self, raw: &str) -> Option<Value> {
        match self {
            DocumentKind::Tasks => normalized_of::<TasksDocument>(raw),
            DocumentKind::Kanban => normalized_of::<KanbanDocument>(raw),
            DocumentKind::ContentPipeline => normalized_of::<ContentDocument>(raw),
            DocumentKind::Ideas => normalized_of::<IdeasDocument>(raw),
            DocumentKind::MemoryLog => normalized_of::<MemoryDocument>(raw),
            DocumentKind::Agenda => normalized_of::<AgendaDocument>(raw),
            DocumentKind::Analytics => normalized_of::<AnalyticsDocument>(raw),
            DocumentKind::DocsRegistry => normalized_of::<DocsDocument>(raw),
            DocumentKind::Sprint => normalized_of::<SprintDocument>(raw),
            DocumentKind::CalendarCache => normalized_of::<CalendarCache>(raw),
        }
    }

    fn declared_kind(self) -> DocumentKind {
        match self {
            DocumentKind::Tasks => TasksDocument::KIND,
            DocumentKind::Kanban => KanbanDocument::KIND,
            DocumentKind::ContentPipeline => ContentDocument::KIND,
            DocumentKind::Ideas => IdeasDocument::KIND,
            DocumentKind::MemoryLog => MemoryDocument::KIND,
            DocumentKind::Agenda => AgendaDocument::KIND,
            DocumentKind::Analytics => AnalyticsDocument::KIND,
            DocumentKind::DocsRegistry => DocsDocument::KIND,
            DocumentKind::Sprint => SprintDocument::KIND,
            DocumentKind::CalendarCache => CalendarCache::KIND,
        }
    }
}

fn default_of<D: Document>() -> Result<Value> {
    Ok(serde_json::to_value(D::default_document())?)
}

fn normalized_of<D: Document>(raw: &str) -> Option<Value> {
    let doc: D = serde_json::from_str(raw).ok()?;
    serde_json::to_value(doc.normalized()).ok()
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentKind {
    type Err = HqError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().trim_end_matches(".json");
        DocumentKind::ALL
            .into_iter()
            .find(|k| k.name() == name)
            .ok_or_else(|| HqError::Api(format!("Unknown document '{}'", s)))
    }
}

/// Check the registry is self-consistent. Run once at startup.
pub fn verify() -> Result<()> {
    let mut seen = HashSet::new();
    for kind in DocumentKind::ALL {
        if !seen.insert(kind.name()) {
            return Err(HqError::Config(format!(
                "Document name '{}' registered twice",
                kind
            )));
        }
        if kind.declared_kind() != kind {
            return Err(HqError::Config(format!(
                "Document type for '{}' declares kind '{}'",
                kind,
                kind.declared_kind()
            )));
        }
        let default = kind.default_value()?;
        let Some(object) = default.as_object() else {
            return Err(HqError::Config(format!(
                "Default for '{}' is not a JSON object",
                kind
            )));
        };
        if !object.contains_key("lastModified") {
            return Err(HqError::Config(format!(
                "Default for '{}' has no lastModified field",
                kind
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_verifies() {
        verify().unwrap();
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in DocumentKind::ALL {
            assert_eq!(kind.name().parse::<DocumentKind>().unwrap(), kind);
        }
        assert_eq!(
            "content-pipeline.json".parse::<DocumentKind>().unwrap(),
            DocumentKind::ContentPipeline
        );
        assert!("nope".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn file_paths_match_storage_layout() {
        assert_eq!(
            DocumentKind::DocsRegistry.file_path(),
            PathBuf::from("docs-registry.json")
        );
        assert_eq!(
            DocumentKind::MemoryLog.file_path(),
            PathBuf::from("memory-log.json")
        );
    }

    #[test]
    fn kanban_default_seeds_columns_and_labels() {
        let value = DocumentKind::Kanban.default_value().unwrap();
        let columns: Vec<&str> = value["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["id"].as_str().unwrap())
            .collect();
        assert_eq!(columns, ["backlog", "in-progress", "review", "done"]);
        assert_eq!(value["labels"].as_array().unwrap().len(), 4);
        assert!(value["archive"].as_array().unwrap().is_empty());
    }

    #[test]
    fn defaults_are_stable_across_calls() {
        for kind in DocumentKind::ALL {
            assert_eq!(
                kind.default_value().unwrap(),
                kind.default_value().unwrap()
            );
        }
    }
}
