//! Analytics document (`analytics.json`): free-form metric entries per platform.

use super::lenient;
use super::{Document, DocumentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Platform {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub entries: Vec<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsDocument {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub platforms: BTreeMap<String, Platform>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Document for AnalyticsDocument {
    const KIND: DocumentKind = DocumentKind::Analytics;

    fn default_document() -> Self {
        Self {
            platforms: BTreeMap::new(),
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
