use super::merge_document;
use crate::error::Result;
use crate::model::analytics::{AnalyticsDocument, Platform};
use crate::model::date_of;
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

pub fn report<S: DocumentStore>(store: &S) -> AnalyticsDocument {
    store.read()
}

/// Append a metrics entry to an existing platform. `date` defaults to today;
/// an unknown platform key is a no-op.
pub fn add_entry<S: DocumentStore>(
    store: &S,
    platform: &str,
    mut entry: Map<String, Value>,
    now: DateTime<Utc>,
) -> Result<AnalyticsDocument> {
    let has_date = entry
        .get("date")
        .and_then(Value::as_str)
        .is_some_and(|d| !d.is_empty());
    if !has_date {
        entry.insert("date".to_string(), Value::String(date_of(now)));
    }
    store.update(|mut doc: AnalyticsDocument| {
        if let Some(p) = doc.platforms.get_mut(platform) {
            p.entries.push(entry);
        }
        doc
    })
}

/// Create a platform. An existing key keeps its entries and only gets the
/// new display name.
pub fn add_platform<S: DocumentStore>(
    store: &S,
    key: &str,
    name: &str,
) -> Result<AnalyticsDocument> {
    store.update(|mut doc: AnalyticsDocument| {
        doc.platforms
            .entry(key.to_string())
            .or_insert_with(Platform::default)
            .name = name.to_string();
        doc
    })
}

/// Replace top-level fields with those in `patch`, keeping the rest.
pub fn merge<S: DocumentStore>(store: &S, patch: Map<String, Value>) -> Result<AnalyticsDocument> {
    merge_document(store, patch)
}
