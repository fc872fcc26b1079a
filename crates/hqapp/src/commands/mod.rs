//! # Command Layer
//!
//! This module contains the **feature logic** of HQ. Each feature lives in its
//! own submodule and owns exactly one document (plus, for [`docs`], the
//! markdown files the registry points at).
//!
//! ## Role and Responsibilities
//!
//! Every mutating command has the same shape:
//!
//! ```text
//! store.update(|doc| policy(doc, input, now))
//! ```
//!
//! - The closure is pure. All time-dependent behavior (`createdAt`,
//!   `completedAt`, `publishedAt`, cap keys) reads the `now` argument, never
//!   the clock, so tests can pin time.
//! - The return value is the **full document as persisted**, including the
//!   fresh `lastModified`. Callers never re-read.
//! - An unknown id, column or platform leaves the document unchanged. It is
//!   still written, which only refreshes `lastModified`.
//!
//! ## What Commands Do NOT Do
//!
//! - **Any terminal I/O**: no stdout, no formatting. The CLI decides.
//! - **Argument parsing**: inputs arrive as typed structs (`NewTask`,
//!   `CardPatch`, ...). Patch structs use `Option` per field: `None` keeps
//!   the current value.
//! - **Talk to collaborators directly**: [`agenda`] receives a
//!   [`CalendarSource`](crate::collab::CalendarSource) and a
//!   [`MessageSink`](crate::collab::MessageSink) from the caller.
//!
//! ## Testing Strategy
//!
//! Command tests run against `DocStore<MemBackend>` and pin `now`. Storage
//! behavior itself is tested in [`crate::store`].
//!
//! ## Command Modules
//!
//! - [`tasks`]: daily task list
//! - [`kanban`]: board with a capped "done" column and labels
//! - [`content`]: content pipeline with a capped published set and angles
//! - [`ideas`]: idea inbox with archive and tags
//! - [`memory`]: memory log, recent window and activity
//! - [`agenda`]: per-day notes, today view and delivery
//! - [`docs`]: docs registry and markdown files
//! - [`analytics`]: per-platform metric entries
//! - [`sprint`]: free-form sprint tracker
//! - [`calendar`]: calendar cache document

use crate::error::{HqError, Result};
use crate::model::Document;
use crate::store::DocumentStore;
use serde_json::{Map, Value};

pub mod agenda;
pub mod analytics;
pub mod calendar;
pub mod content;
pub mod docs;
pub mod ideas;
pub mod kanban;
pub mod memory;
pub mod sprint;
pub mod tasks;

/// Overwrite `target` with `value` when the patch carries one.
pub(crate) fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// `doc` with each top-level key of `patch` replacing the same key.
fn merged<D: Document>(doc: D, patch: &Map<String, Value>) -> Result<D> {
    let mut value = serde_json::to_value(doc)?;
    if let Value::Object(fields) = &mut value {
        for (key, field) in patch {
            fields.insert(key.clone(), field.clone());
        }
    }
    serde_json::from_value(value)
        .map_err(|e| HqError::Api(format!("Invalid {} document: {}", D::KIND, e)))
}

/// Shallow-merge `patch` into a whole document.
///
/// The patch is checked against the default document before anything is
/// written, so a malformed patch fails without touching the file.
pub(crate) fn merge_document<S, D>(store: &S, patch: Map<String, Value>) -> Result<D>
where
    S: DocumentStore,
    D: Document,
{
    merged(D::default_document(), &patch)?;
    store.update(|doc: D| {
        let fallback = doc.clone();
        merged(doc, &patch).unwrap_or(fallback)
    })
}
