//! # HQ Architecture
//!
//! HQ is a **UI-agnostic personal productivity backend**: a daily task list,
//! a kanban board, a content pipeline, an idea inbox, a memory log, an agenda,
//! a docs registry, analytics, a sprint tracker and a calendar cache. Every
//! feature persists one JSON document in a single data directory.
//!
//! This crate is the library. The `hq` binary is one client of it.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Client (the hq CLI, or anything else)                      │
//! │  - Parses input, renders output, owns stdout/exit codes     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade: owns stores, clock, limits, collaborators   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per feature, pure closures over documents     │
//! │  - Policies (policy/) for caps, labels and windows          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/, drafts.rs)                          │
//! │  - DocumentStore over a StorageBackend                      │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values and returns Rust values. It
//! never prints and never exits. The only outbound network call is the
//! Telegram delivery in [`collab::telegram`], always behind the
//! [`collab::MessageSink`] trait.
//!
//! ## Testing Strategy
//!
//! 1. **Commands and policies**: unit tests against `MemBackend` with a
//!    pinned `now`. Most tests live here.
//! 2. **Store**: backend contract tests, plus filesystem tests under
//!    `tests/` using temporary directories.
//! 3. **API**: wiring tests only (limits, shared backend, collaborators).
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Feature logic
//! - [`policy`]: Capped collections, label sets, date windows
//! - [`store`]: Document store and storage backends
//! - [`drafts`]: Draft files with timestamped backups
//! - [`model`]: Document types and the document registry
//! - [`collab`]: Calendar and message delivery collaborators
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod collab;
pub mod commands;
pub mod config;
pub mod drafts;
pub mod error;
pub mod model;
pub mod policy;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use api::HqApi;
pub use config::{HqConfig, Limits};
pub use error::{HqError, Result};
