use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const BODY_HELP: &str = "JSON object, or - to read it from stdin";

#[derive(Parser, Debug)]
#[command(
    name = "hq",
    bin_name = "hq",
    version,
    disable_help_subcommand = true,
    after_help = "Request bodies are JSON objects with camelCase keys, e.g.\n  hq tasks add '{\"title\": \"Record intro\", \"priority\": \"high\"}'"
)]
#[command(about = "Personal productivity dashboard backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (overrides HQ_DATA_DIR and hq.toml)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Config file (default: hq.toml in the user config directory)
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Daily task list
    #[command(display_order = 1)]
    Tasks {
        #[command(subcommand)]
        action: Option<TaskCommands>,
    },

    /// Kanban board
    #[command(display_order = 2)]
    Kanban {
        #[command(subcommand)]
        action: Option<KanbanCommands>,
    },

    /// Content pipeline
    #[command(display_order = 3)]
    Content {
        #[command(subcommand)]
        action: Option<ContentCommands>,
    },

    /// Draft text and backups for content pieces
    #[command(display_order = 4)]
    Drafts {
        #[command(subcommand)]
        action: DraftCommands,
    },

    /// Idea inbox
    #[command(display_order = 5)]
    Ideas {
        #[command(subcommand)]
        action: Option<IdeaCommands>,
    },

    /// Memory log
    #[command(display_order = 6)]
    Memory {
        #[command(subcommand)]
        action: Option<MemoryCommands>,
    },

    /// Daily agenda and delivery
    #[command(display_order = 7)]
    Agenda {
        #[command(subcommand)]
        action: Option<AgendaCommands>,
    },

    /// Docs registry and markdown files
    #[command(display_order = 8)]
    Docs {
        #[command(subcommand)]
        action: Option<DocCommands>,
    },

    /// Per-platform analytics
    #[command(display_order = 9)]
    Analytics {
        #[command(subcommand)]
        action: Option<AnalyticsCommands>,
    },

    /// Sprint tracker
    #[command(display_order = 10)]
    Sprint {
        #[command(subcommand)]
        action: Option<SprintCommands>,
    },

    /// Calendar cache
    #[command(display_order = 11)]
    Calendar {
        #[command(subcommand)]
        action: Option<CalendarCommands>,
    },

    /// Print any document as JSON (tasks, kanban, content-pipeline, ...)
    #[command(display_order = 20)]
    Show { document: String },

    /// Check the document registry and data directory
    #[command(display_order = 21)]
    Doctor,
}

/// A JSON request body argument.
#[derive(Args, Debug)]
pub struct Body {
    #[arg(help = BODY_HELP)]
    pub json: String,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List tasks, optionally for one day
    #[command(alias = "ls")]
    List {
        /// Day as YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
    },
    /// Add a task
    Add(Body),
    /// Patch a task
    Update {
        id: String,
        #[command(flatten)]
        body: Body,
    },
    /// Mark a task done
    Done { id: String },
    /// Delete a task
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum KanbanCommands {
    /// Add a card
    Add {
        /// Target column (default: backlog)
        #[arg(long)]
        column: Option<String>,
        #[command(flatten)]
        body: Body,
    },
    /// Move a card between or within columns
    #[command(alias = "mv")]
    Move {
        card: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Position in the target column
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
    /// Patch a card
    Update {
        card: String,
        #[command(flatten)]
        body: Body,
    },
    /// Move a card into the archive
    Archive { column: String, card: String },
    /// Bring an archived card back into "done"
    Restore { card: String },
    /// Add a board label
    Label { label: String },
    /// Remove a board label
    Unlabel { label: String },
}

#[derive(Subcommand, Debug)]
pub enum ContentCommands {
    /// Add a piece
    Add(Body),
    /// Patch a piece
    Update {
        id: String,
        #[command(flatten)]
        body: Body,
    },
    /// Move a piece into the archive
    Archive { id: String },
    /// Bring an archived piece back as "ready"
    Restore { id: String },
    /// Delete a piece
    #[command(alias = "rm")]
    Delete {
        id: String,
        /// Delete from the archive instead of the live pipeline
        #[arg(long)]
        archived: bool,
    },
    /// Add an angle
    AddAngle {
        name: String,
        #[arg(long)]
        color: Option<String>,
    },
    /// Rename or recolor an angle
    UpdateAngle {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete an angle
    DeleteAngle { id: String },
}

#[derive(Subcommand, Debug)]
pub enum DraftCommands {
    /// Print the current draft
    Read { piece: String, format: String },
    /// Replace the draft, backing up the previous text
    Write {
        piece: String,
        format: String,
        /// New text, or - to read it from stdin
        text: String,
    },
    /// List backups, newest first
    Backups { piece: String, format: String },
    /// Print one backup
    Backup { filename: String },
}

#[derive(Subcommand, Debug)]
pub enum IdeaCommands {
    /// Add an idea to the top of the inbox
    Add(Body),
    /// Patch an idea
    Update {
        id: String,
        #[command(flatten)]
        body: Body,
    },
    /// Move an idea into the archive
    Archive { id: String },
    /// Bring an archived idea back
    Restore { id: String },
    /// Delete an archived idea
    Purge { id: String },
    /// Add a tag
    Tag { tag: String },
    /// Remove a tag
    Untag { tag: String },
}

#[derive(Subcommand, Debug)]
pub enum MemoryCommands {
    /// Add an entry
    Add(Body),
    /// Patch an entry
    Update {
        id: String,
        #[command(flatten)]
        body: Body,
    },
    /// Delete an entry
    #[command(alias = "rm")]
    Delete { id: String },
    /// Entries inside the recent window
    Recent,
    /// Move entries older than the recent window into the archive
    ArchiveStale,
    /// Entries per day
    Activity {
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum AgendaCommands {
    /// Today's tasks, events and notes
    Today,
    /// Set the notes for a day
    Notes {
        text: String,
        /// Day as YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Patch an agenda entry
    Update {
        id: String,
        #[command(flatten)]
        body: Body,
    },
    /// Send today's agenda through Telegram
    Send,
}

#[derive(Subcommand, Debug)]
pub enum DocCommands {
    /// List files under docs/
    Files,
    /// Print a doc file
    Read { filename: String },
    /// Register a doc
    Add(Body),
    /// Patch a doc entry
    Update {
        id: String,
        #[command(flatten)]
        body: Body,
    },
    /// Remove a registry entry, keeping the file
    #[command(alias = "rm")]
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum AnalyticsCommands {
    /// Append a metrics entry to a platform
    Add {
        platform: String,
        #[command(flatten)]
        body: Body,
    },
    /// Create or rename a platform
    Platform { key: String, name: String },
    /// Replace top-level fields
    Merge(Body),
}

#[derive(Subcommand, Debug)]
pub enum SprintCommands {
    /// Replace top-level fields
    Update(Body),
}

#[derive(Subcommand, Debug)]
pub enum CalendarCommands {
    /// Cached events between two days
    Events {
        /// First day, YYYY-MM-DD
        from: String,
        /// Last day, YYYY-MM-DD (default: same as first)
        to: Option<String>,
    },
    /// Replace the cached events with a JSON array
    Replace {
        #[arg(help = "JSON array of events, or - to read it from stdin")]
        json: String,
    },
}
