//! Sprint tracker document (`sprint.json`). Sprint bodies are free-form.

use super::lenient;
use super::{Document, DocumentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintDocument {
    #[serde(default)]
    pub current_sprint: Option<Value>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub past_sprints: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document for SprintDocument {
    const KIND: DocumentKind = DocumentKind::Sprint;

    fn default_document() -> Self {
        Self {
            current_sprint: None,
            past_sprints: Vec::new(),
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
