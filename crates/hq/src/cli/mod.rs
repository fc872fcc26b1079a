//! # CLI Behavior
//!
//! This is **one possible UI client** for HQ, not the application itself.
//!
//! ## Shape
//!
//! `hq <feature> [action] [args]`. A feature without an action prints its
//! document. Actions that create or patch take a JSON body using the same
//! camelCase keys as the stored documents; `-` reads the body from stdin.
//! Mutations print the full document as persisted.
//!
//! ## Data Directory
//!
//! Resolved by `hqapp::config`: `--data-dir`, then `HQ_DATA_DIR`, then
//! `data_dir` in `hq.toml`. With none of them set, `hq` exits with an error
//! before touching anything.
//!
//! ## Logging
//!
//! Library logs go to stderr. `HQ_LOG` takes a tracing filter
//! (`HQ_LOG=hqapp=debug`); otherwise `-v` selects `debug` and the default is
//! `warn`.
//!
//! ## Module Structure
//!
//! - `commands`: Config loading, logging setup and per-feature handlers
//! - `render`: Output formatting
//! - `setup`: Argument parsing via clap, help text

mod commands;
mod render;
pub mod setup;

pub use commands::run;
