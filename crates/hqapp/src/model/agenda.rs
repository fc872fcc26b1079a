//! Daily agenda document (`agenda.json`): one entry per calendar date.

use super::lenient::{self, Stamp};
use super::{Document, DocumentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgendaEntry {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(deserialize_with = "lenient::string")]
    pub apollo_notes: String,
    #[serde(deserialize_with = "lenient::boolean")]
    pub sent_to_telegram: bool,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: Stamp,
    pub updated_at: Stamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaDocument {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub entries: Vec<AgendaEntry>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AgendaDocument {
    pub fn entry_for(&self, date: &str) -> Option<&AgendaEntry> {
        self.entries.iter().find(|e| e.date == date)
    }
}

impl Document for AgendaDocument {
    const KIND: DocumentKind = DocumentKind::Agenda;

    fn default_document() -> Self {
        Self {
            entries: Vec::new(),
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
