use super::merge_document;
use crate::error::Result;
use crate::model::sprint::SprintDocument;
use crate::store::DocumentStore;
use serde_json::{Map, Value};

pub fn current<S: DocumentStore>(store: &S) -> SprintDocument {
    store.read()
}

/// Shallow merge: `currentSprint`, `pastSprints` or any other top-level key
/// in `patch` replaces the stored value wholesale.
pub fn update<S: DocumentStore>(store: &S, patch: Map<String, Value>) -> Result<SprintDocument> {
    merge_document(store, patch)
}
