//! # Domain Model: Documents
//!
//! Every HQ module persists exactly one JSON document in the data directory
//! (`tasks.json`, `kanban.json`, ...). This module defines those documents and
//! the [`Document`] trait tying each one to its [`DocumentKind`] in the
//! [`registry`].
//!
//! ## On-Disk Format
//!
//! Field names are camelCase on disk. Documents may be written by cooperating
//! agents outside HQ, so deserialization is deliberately forgiving:
//!
//! - Missing fields take their defaults (`#[serde(default)]` on every entity).
//! - Off-schema values are coerced rather than failing the whole document:
//!   `null` lists read as empty, scalars become strings. See [`lenient`].
//! - Optional timestamps that fail to parse become `null`. Required ones
//!   ([`lenient::Stamp`]) keep the raw value and write it back unchanged.
//! - Unknown keys survive a read-modify-write via a flattened `extra` map,
//!   at the top level and on tasks, cards and content pieces.
//!
//! A document that cannot be parsed at all is replaced by its registry
//! default on read. Updates refuse to write over it; see [`crate::store`].

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod agenda;
pub mod analytics;
pub mod calendar;
pub mod content;
pub mod docs;
pub mod ideas;
pub mod kanban;
pub mod lenient;
pub mod memory;
pub mod registry;
pub mod sprint;
pub mod tasks;

pub use registry::DocumentKind;

/// A named JSON document persisted as one file.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + 'static {
    /// Registry entry this document is stored under.
    const KIND: DocumentKind;

    /// The value a read yields when the file is missing or unparsable.
    fn default_document() -> Self;

    fn last_modified(&self) -> Option<DateTime<Utc>>;

    fn set_last_modified(&mut self, at: DateTime<Utc>);

    /// Read-time normalization (seeding empty label sets, filling channels).
    fn normalized(self) -> Self {
        self
    }
}

/// Calendar date (`YYYY-MM-DD`, UTC) of an instant.
pub fn date_of(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
