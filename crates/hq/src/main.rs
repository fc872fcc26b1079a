//! # HQ CLI
//!
//! The `hq` binary is intentionally thin: the CLI lives in `src/cli/`, while
//! this file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/hqapp/`: the UI-agnostic library (store, policies, drafts,
//!   feature commands, API facade)
//! - `crates/hq/`: this CLI, one client of `hqapp` among possible others
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/hq/src/cli/)                             │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Config, logging and dispatch (commands.rs)               │
//! │  - Output formatting (render.rs)                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/hqapp/src/api.rs)                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Testing Approach
//!
//! - Argument parsing and rendering: unit tests in `src/cli/`.
//! - End to end: `tests/cli_e2e.rs` runs the built binary against a
//!   temporary data directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
