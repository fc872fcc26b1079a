//! Docs registry document (`docs-registry.json`).
//!
//! The registry only describes markdown files kept under `docs/`; the file
//! contents themselves are plain text handled by [`crate::commands::docs`].

use super::lenient::{self, Stamp};
use super::{Document, DocumentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_DOC_CATEGORY: &str = "strategy";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocEntry {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub filename: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub category: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    pub added_at: Stamp,
    pub last_modified: Stamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsDocument {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub docs: Vec<DocEntry>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document for DocsDocument {
    const KIND: DocumentKind = DocumentKind::DocsRegistry;

    fn default_document() -> Self {
        Self {
            docs: Vec::new(),
            last_modified: None,
            extra: Map::new(),
        }
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    fn set_last_modified(&mut self, at: DateTime<Utc>) {
        self.last_modified = Some(at);
    }
}
