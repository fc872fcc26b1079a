//! Idea inbox document (`ideas.json`).

use super::lenient::{self, Stamp};
use super::{Document, DocumentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_TAGS: [&str; 5] = ["content", "business", "personal", "tool", "strategy"];
pub const DEFAULT_SOURCE: &str = "ivan";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Idea {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub body: String,
    #[serde(deserialize_with = "lenient::string")]
    pub source: String,
    #[serde(deserialize_with = "lenient::strings")]
    pub tags: Vec<String>,
    pub created_at: Stamp,
    pub updated_at: Stamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeasDocument {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub ideas: Vec<Idea>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub archive: Vec<Idea>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub fn default_tags() -> Vec<String> {
    DEFAULT_TAGS.iter().map(|t| t.to_string()).collect()
}

impl Document for IdeasDocument {
    const KIND: DocumentKind = DocumentKind::Ideas;

    fn default_document() -> Self {
        Self {
            ideas: Vec::new(),
            archive: Vec::new(),
            tags: default_tags(),
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
        if self.tags.is_empty() {
            self.tags = default_tags();
        }
        self
    }
}
