//! Calendar cache document (`calendar-cache.json`).
//!
//! The cache is filled by an external sync job (or [`crate::commands::calendar::replace_cache`])
//! and read back by the cache-backed [`crate::collab::CachedCalendar`].

use super::lenient;
use super::{Document, DocumentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    /// ISO date (`YYYY-MM-DD`) for all-day events, ISO date-time otherwise.
    #[serde(deserialize_with = "lenient::string")]
    pub start: String,
    #[serde(deserialize_with = "lenient::string")]
    pub end: String,
    #[serde(deserialize_with = "lenient::boolean")]
    pub all_day: bool,
    #[serde(deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub calendar: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub source: Option<String>,
}

impl CalendarEvent {
    /// The calendar day the event starts on.
    pub fn start_date(&self) -> &str {
        self.start.split('T').next().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCache {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub events: Vec<CalendarEvent>,
    /// Empty until the cache has been filled at least once.
    #[serde(default, deserialize_with = "lenient::string")]
    pub fetched_at: String,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document for CalendarCache {
    const KIND: DocumentKind = DocumentKind::CalendarCache;

    fn default_document() -> Self {
        Self {
            events: Vec::new(),
            fetched_at: String::new(),
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
