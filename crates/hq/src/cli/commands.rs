//! # CLI Dispatch
//!
//! The CLI layer is the **only** place in the workspace that:
//! - Knows about terminal I/O (stdout, stderr, stdin)
//! - Installs a tracing subscriber
//! - Decides the process exit code (via `main.rs`)
//!
//! Every handler follows the same path: parse the request body (if any) into
//! the library's input type, call one `HqApi` method, print the result.

use super::render;
use super::setup::{
    AgendaCommands, AnalyticsCommands, Body, CalendarCommands, Cli, Commands, ContentCommands,
    DocCommands, DraftCommands, IdeaCommands, KanbanCommands, MemoryCommands, SprintCommands,
    TaskCommands,
};
use anyhow::{bail, Context};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use hqapp::commands::content::PieceList;
use hqapp::commands::kanban::CardMove;
use hqapp::commands::tasks::TaskPatch;
use hqapp::config::{default_config_path, HqConfig};
use hqapp::drafts::DraftFormat;
use hqapp::model::registry;
use hqapp::model::DocumentKind;
use hqapp::store::fs_backend::FsBackend;
use hqapp::HqApi;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HQ_LOG";

type Api = HqApi<FsBackend>;

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    debug!(data_dir = %config.data_dir.display(), "configuration loaded");
    let api = HqApi::from_config(&config)?;

    let output = dispatch(&api, cli.command)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> anyhow::Result<HqConfig> {
    // Environment outranks the config file, so the flag goes in as HQ_DATA_DIR.
    if let Some(dir) = &cli.data_dir {
        std::env::set_var("HQ_DATA_DIR", dir);
    }
    let file = cli.config.clone().or_else(default_config_path);
    let file = file.filter(|path| path.exists());
    Ok(HqConfig::load_from(file.as_deref())
        .context("set --data-dir or HQ_DATA_DIR to choose where HQ keeps its data")?)
}

/// Read a JSON argument, or stdin when it is `-`.
fn read_arg(raw: &str) -> anyhow::Result<String> {
    if raw != "-" {
        return Ok(raw.to_string());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

fn parse_body<T: DeserializeOwned>(body: &Body) -> anyhow::Result<T> {
    let raw = read_arg(&body.json)?;
    serde_json::from_str(&raw).context("request body is not valid JSON for this command")
}

fn object(body: &Body) -> anyhow::Result<serde_json::Map<String, serde_json::Value>> {
    parse_body(body)
}

fn parse_format(raw: &str) -> anyhow::Result<DraftFormat> {
    Ok(raw.parse::<DraftFormat>()?)
}

fn out<T: Serialize>(value: hqapp::Result<T>) -> anyhow::Result<String> {
    render::json(&value?)
}

fn dispatch(api: &Api, command: Commands) -> anyhow::Result<String> {
    match command {
        Commands::Tasks { action } => tasks(api, action),
        Commands::Kanban { action } => kanban(api, action),
        Commands::Content { action } => content(api, action),
        Commands::Drafts { action } => drafts(api, action),
        Commands::Ideas { action } => ideas(api, action),
        Commands::Memory { action } => memory(api, action),
        Commands::Agenda { action } => agenda(api, action),
        Commands::Docs { action } => docs(api, action),
        Commands::Analytics { action } => analytics(api, action),
        Commands::Sprint { action } => sprint(api, action),
        Commands::Calendar { action } => calendar(api, action),
        Commands::Show { document } => render::json(&api.show(&document)?),
        Commands::Doctor => doctor(api),
    }
}

fn tasks(api: &Api, action: Option<TaskCommands>) -> anyhow::Result<String> {
    match action {
        None | Some(TaskCommands::List { date: None }) => render::json(&api.tasks()),
        Some(TaskCommands::List { date: Some(date) }) => {
            render::json(&api.tasks_for_date(&date))
        }
        Some(TaskCommands::Add(body)) => out(api.add_task(parse_body(&body)?)),
        Some(TaskCommands::Update { id, body }) => out(api.update_task(&id, parse_body(&body)?)),
        Some(TaskCommands::Done { id }) => out(api.update_task(
            &id,
            TaskPatch {
                status: Some("done".to_string()),
                ..Default::default()
            },
        )),
        Some(TaskCommands::Delete { id }) => out(api.delete_task(&id)),
    }
}

fn kanban(api: &Api, action: Option<KanbanCommands>) -> anyhow::Result<String> {
    let Some(action) = action else {
        return render::json(&api.kanban());
    };
    match action {
        KanbanCommands::Add { column, body } => {
            out(api.add_card(column.as_deref(), parse_body(&body)?))
        }
        KanbanCommands::Move {
            card,
            from,
            to,
            index,
        } => out(api.move_card(&CardMove {
            card_id: card,
            from_column: from,
            to_column: to,
            to_index: index,
        })),
        KanbanCommands::Update { card, body } => out(api.update_card(&card, parse_body(&body)?)),
        KanbanCommands::Archive { column, card } => out(api.archive_card(&column, &card)),
        KanbanCommands::Restore { card } => out(api.restore_card(&card)),
        KanbanCommands::Label { label } => out(api.add_label(&label)),
        KanbanCommands::Unlabel { label } => out(api.delete_label(&label)),
    }
}

fn content(api: &Api, action: Option<ContentCommands>) -> anyhow::Result<String> {
    let Some(action) = action else {
        return render::json(&api.content());
    };
    match action {
        ContentCommands::Add(body) => out(api.add_piece(parse_body(&body)?)),
        ContentCommands::Update { id, body } => out(api.update_piece(&id, parse_body(&body)?)),
        ContentCommands::Archive { id } => out(api.archive_piece(&id)),
        ContentCommands::Restore { id } => out(api.restore_piece(&id)),
        ContentCommands::Delete { id, archived } => {
            let from = if archived {
                PieceList::Archive
            } else {
                PieceList::Content
            };
            out(api.delete_piece(&id, from))
        }
        ContentCommands::AddAngle { name, color } => out(api.add_angle(&name, color.as_deref())),
        ContentCommands::UpdateAngle { id, name, color } => {
            out(api.update_angle(&id, name, color))
        }
        ContentCommands::DeleteAngle { id } => out(api.delete_angle(&id)),
    }
}

fn drafts(api: &Api, action: DraftCommands) -> anyhow::Result<String> {
    match action {
        DraftCommands::Read { piece, format } => {
            Ok(api.read_draft(&piece, parse_format(&format)?)?)
        }
        DraftCommands::Write {
            piece,
            format,
            text,
        } => {
            let format = parse_format(&format)?;
            api.write_draft(&piece, format, &read_arg(&text)?)?;
            let backups = api.list_backups(&piece, format)?;
            Ok(format!("Saved {}-{} ({} backups)", piece, format, backups.len()))
        }
        DraftCommands::Backups { piece, format } => {
            let backups = api.list_backups(&piece, parse_format(&format)?)?;
            Ok(render::backups(&backups, Utc::now()))
        }
        DraftCommands::Backup { filename } => Ok(api.read_backup(&filename)?),
    }
}

fn ideas(api: &Api, action: Option<IdeaCommands>) -> anyhow::Result<String> {
    let Some(action) = action else {
        return render::json(&api.ideas());
    };
    match action {
        IdeaCommands::Add(body) => out(api.add_idea(parse_body(&body)?)),
        IdeaCommands::Update { id, body } => out(api.update_idea(&id, parse_body(&body)?)),
        IdeaCommands::Archive { id } => out(api.archive_idea(&id)),
        IdeaCommands::Restore { id } => out(api.restore_idea(&id)),
        IdeaCommands::Purge { id } => out(api.delete_archived_idea(&id)),
        IdeaCommands::Tag { tag } => out(api.add_tag(&tag)),
        IdeaCommands::Untag { tag } => out(api.delete_tag(&tag)),
    }
}

fn memory(api: &Api, action: Option<MemoryCommands>) -> anyhow::Result<String> {
    let Some(action) = action else {
        return render::json(&api.memory());
    };
    match action {
        MemoryCommands::Add(body) => out(api.add_memory(parse_body(&body)?)),
        MemoryCommands::Update { id, body } => out(api.update_memory(&id, parse_body(&body)?)),
        MemoryCommands::Delete { id } => out(api.delete_memory(&id)),
        MemoryCommands::Recent => render::json(&api.recent_memory()),
        MemoryCommands::ArchiveStale => out(api.archive_stale_memory()),
        MemoryCommands::Activity { days } => Ok(render::activity(&api.memory_activity(days))),
    }
}

fn agenda(api: &Api, action: Option<AgendaCommands>) -> anyhow::Result<String> {
    let Some(action) = action else {
        return render::json(&api.agenda());
    };
    match action {
        AgendaCommands::Today => render::json(&api.today()),
        AgendaCommands::Notes { text, date } => {
            out(api.upsert_agenda(date.as_deref(), &read_arg(&text)?))
        }
        AgendaCommands::Update { id, body } => out(api.update_agenda(&id, parse_body(&body)?)),
        AgendaCommands::Send => out(api.send_agenda()),
    }
}

fn docs(api: &Api, action: Option<DocCommands>) -> anyhow::Result<String> {
    let Some(action) = action else {
        return render::json(&api.docs());
    };
    match action {
        DocCommands::Files => Ok(api.doc_files()?.join("\n")),
        DocCommands::Read { filename } => Ok(api.read_doc(&filename)?),
        DocCommands::Add(body) => out(api.register_doc(parse_body(&body)?)),
        DocCommands::Update { id, body } => out(api.update_doc(&id, parse_body(&body)?)),
        DocCommands::Delete { id } => out(api.delete_doc(&id)),
    }
}

fn analytics(api: &Api, action: Option<AnalyticsCommands>) -> anyhow::Result<String> {
    let Some(action) = action else {
        return render::json(&api.analytics());
    };
    match action {
        AnalyticsCommands::Add { platform, body } => {
            out(api.add_analytics_entry(&platform, object(&body)?))
        }
        AnalyticsCommands::Platform { key, name } => out(api.add_platform(&key, &name)),
        AnalyticsCommands::Merge(body) => out(api.merge_analytics(object(&body)?)),
    }
}

fn sprint(api: &Api, action: Option<SprintCommands>) -> anyhow::Result<String> {
    match action {
        None => render::json(&api.sprint()),
        Some(SprintCommands::Update(body)) => out(api.update_sprint(object(&body)?)),
    }
}

fn day(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("'{}' is not a YYYY-MM-DD date", raw))
}

fn calendar(api: &Api, action: Option<CalendarCommands>) -> anyhow::Result<String> {
    let Some(action) = action else {
        return render::json(&api.calendar_cache());
    };
    match action {
        CalendarCommands::Events { from, to } => {
            let start = day(&from)?;
            let end = match to {
                Some(to) => day(&to)?,
                None => start,
            };
            if end < start {
                bail!("last day {} is before first day {}", end, start);
            }
            let (Some(start), Some(end)) = (start.and_hms_opt(0, 0, 0), end.and_hms_opt(23, 59, 59))
            else {
                bail!("date out of range");
            };
            render::json(&api.calendar_events(start.and_utc(), end.and_utc()))
        }
        CalendarCommands::Replace { json } => {
            let events = serde_json::from_str(&read_arg(&json)?)
                .context("expected a JSON array of calendar events")?;
            out(api.replace_calendar(events))
        }
    }
}

fn doctor(api: &Api) -> anyhow::Result<String> {
    registry::verify()?;
    let mut lines = vec![format!("data dir: {}", api.data_dir().display())];
    for kind in DocumentKind::ALL {
        let file = kind.file_path();
        let state = if api.data_dir().join(&file).exists() {
            "ok"
        } else {
            "missing (defaults)"
        };
        lines.push(format!("{:<24} {}", file.display().to_string(), state));
    }
    lines.push(format!("{} documents registered", DocumentKind::ALL.len()));
    Ok(lines.join("\n"))
}
