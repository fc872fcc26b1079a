//! # Policy Layer
//!
//! Business rules applied inside [`DocumentStore::update`](crate::store::DocumentStore::update)
//! closures. Every policy here is a pure function: it takes the current
//! state (and `now` where time matters) and returns the next state. None of
//! them perform I/O, and none of them fail. A reference to an unknown id is a
//! no-op, never an error.
//!
//! - [`capped`]: bounded live collections with overflow moved to an archive.
//! - [`labels`]: normalized, idempotent label and tag sets.
//! - [`retention`]: the memory log's recent window.

pub mod capped;
pub mod labels;
pub mod retention;

pub use capped::{archive_overflow, take_by_id};
pub use labels::LabelSet;
