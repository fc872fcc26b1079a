//! # Storage Layer
//!
//! This module defines the storage abstraction for HQ. The [`DocumentStore`]
//! trait is the capability every feature module depends on; nothing outside
//! this module touches files directly.
//!
//! ## Documents
//!
//! A document is one JSON file named after its [`DocumentKind`]. The store
//! guarantees:
//!
//! - **Reads always succeed**: a missing or unparsable file yields the
//!   registry default for that kind.
//! - **Writes are atomic**: content goes to a scratch file first and is then
//!   renamed over the target, so readers never observe half a document and a
//!   crash mid-write leaves the previous version intact.
//! - **The store owns `lastModified`**: every write stamps it; callers never do.
//! - **Updates are serialized per document**: [`DocumentStore::update`] holds
//!   a per-kind lock across read, transform and write, so two updates to the
//!   same document in one process never clobber each other. Separate
//!   processes (or a file-sync tool) can still race; last write wins.
//! - **Updates never replace a file they could not parse**: reads fall back to
//!   the default, but an update over an existing unparsable file fails with
//!   [`HqError::Store`](crate::error::HqError::Store) and leaves it untouched.
//!
//! Write failures propagate as-is. There is no retry.
//!
//! ## Implementations
//!
//! - [`doc_store::DocStore`] over a [`backend::StorageBackend`]:
//!   - [`fs_backend::FsBackend`]: production, files under the data directory.
//!   - [`mem_backend::MemBackend`]: for testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data_dir>/
//! ├── tasks.json, kanban.json, ...   # One file per DocumentKind
//! ├── docs/<filename>                # Markdown referenced by docs-registry.json
//! ├── drafts/<piece>-<format>.md     # Current draft text
//! ├── drafts/backups/<piece>-<format>-<YYYY-MM-DDTHH-MM-SS>.md
//! └── .tmp/                          # Scratch files for atomic writes
//! ```

use crate::error::Result;
use crate::model::{Document, DocumentKind};
use serde_json::Value;

pub mod backend;
pub mod doc_store;
pub mod fs_backend;
pub mod mem_backend;

/// Abstract interface for document storage.
pub trait DocumentStore {
    /// Load a document, or its default when absent or unparsable.
    fn read<D: Document>(&self) -> D;

    /// Stamp `lastModified` and persist atomically. Returns what was written.
    fn write<D: Document>(&self, doc: D) -> Result<D>;

    /// Read, transform, write, as one serialized step per document kind.
    ///
    /// `apply` must be a pure function of the current document. Fails without
    /// writing when the file exists but cannot be parsed.
    fn update<D, F>(&self, apply: F) -> Result<D>
    where
        D: Document,
        F: FnOnce(D) -> D;

    /// A document as untyped JSON, normalized the same way typed reads are.
    fn read_value(&self, kind: DocumentKind) -> Result<Value>;
}
