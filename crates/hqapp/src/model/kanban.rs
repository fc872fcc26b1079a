//! Kanban board document (`kanban.json`).

use super::lenient::{self, Stamp};
use super::{Document, DocumentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const BACKLOG_COLUMN: &str = "backlog";
pub const DONE_COLUMN: &str = "done";
pub const DEFAULT_LABELS: [&str; 4] = ["research", "tool-building", "content", "admin"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Card {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(deserialize_with = "lenient::string")]
    pub priority: String,
    pub created_at: Stamp,
    pub updated_at: Stamp,
    #[serde(deserialize_with = "lenient::strings")]
    pub labels: Vec<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub apollo_notes: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Column {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub cards: Vec<Card>,
}

impl Column {
    fn empty(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            cards: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanDocument {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub columns: Vec<Column>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub archive: Vec<Card>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl KanbanDocument {
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn column_mut(&mut self, id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == id)
    }

    /// Cards currently in the "done" column.
    pub fn done_cards(&self) -> &[Card] {
        self.column(DONE_COLUMN)
            .map(|c| c.cards.as_slice())
            .unwrap_or(&[])
    }
}

pub fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(|l| l.to_string()).collect()
}

impl Document for KanbanDocument {
    const KIND: DocumentKind = DocumentKind::Kanban;

    fn default_document() -> Self {
        Self {
            columns: vec![
                Column::empty(BACKLOG_COLUMN, "Backlog"),
                Column::empty("in-progress", "In Progress"),
                Column::empty("review", "Review"),
                Column::empty(DONE_COLUMN, "Done"),
            ],
            archive: Vec::new(),
            labels: default_labels(),
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

    fn normalized(mut self) -> Self {
        if self.labels.is_empty() {
            self.labels = default_labels();
        }
        self
    }
}
