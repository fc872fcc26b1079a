//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every HQ operation, whichever UI sits on top (the `hq`
//! CLI today, an HTTP server tomorrow).
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns the stores**: one [`DocStore`] and one [`DraftStore`] sharing a
//!   single backend.
//! - **Owns the clock**: commands take `now` explicitly; the facade passes
//!   `Utc::now()`.
//! - **Owns the limits**: caps and windows come from [`HqConfig`] once, so
//!   callers never pass them.
//! - **Wires collaborators**: the cache-backed calendar and, when configured,
//!   the Telegram sink.
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`.
//! - **Presentation**: it returns documents and views, never strings.
//!
//! ## Generic Over StorageBackend
//!
//! `HqApi<B: StorageBackend>`:
//! - Production: `HqApi<FsBackend>` via [`HqApi::from_config`].
//! - Testing: `HqApi<MemBackend>` via [`HqApi::with_backend`].

use crate::collab::{CachedCalendar, MessageSink, TelegramSink};
use crate::commands::agenda::{SendReceipt, TodayView};
use crate::commands::content::PieceList;
use crate::commands::{
    agenda, analytics, calendar, content, docs, ideas, kanban, memory, sprint, tasks,
};
use crate::config::{HqConfig, Limits};
use crate::drafts::{BackupInfo, DraftFormat, DraftStore};
use crate::error::{HqError, Result};
use crate::model::agenda::AgendaDocument;
use crate::model::analytics::AnalyticsDocument;
use crate::model::calendar::{CalendarCache, CalendarEvent};
use crate::model::content::ContentDocument;
use crate::model::docs::DocsDocument;
use crate::model::ideas::IdeasDocument;
use crate::model::kanban::KanbanDocument;
use crate::model::memory::{MemoryDocument, MemoryEntry};
use crate::model::registry;
use crate::model::sprint::SprintDocument;
use crate::model::tasks::{Task, TasksDocument};
use crate::model::DocumentKind;
use crate::store::backend::StorageBackend;
use crate::store::doc_store::DocStore;
use crate::store::fs_backend::FsBackend;
use crate::store::DocumentStore;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TelegramSettings {
    token: String,
    chat_id: String,
}

/// The main API facade for HQ operations.
pub struct HqApi<B: StorageBackend> {
    store: Arc<DocStore<B>>,
    drafts: DraftStore<B>,
    limits: Limits,
    telegram: Option<TelegramSettings>,
}

impl HqApi<FsBackend> {
    /// Open the data directory named by `config`.
    pub fn from_config(config: &HqConfig) -> Result<Self> {
        let mut api = Self::with_backend(FsBackend::new(&config.data_dir), config.limits())?;
        api.telegram = config.telegram().map(|(token, chat_id)| TelegramSettings {
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        });
        Ok(api)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.store.backend().root().to_path_buf()
    }
}

impl<B: StorageBackend> HqApi<B> {
    /// Build over any backend. Verifies the document registry first.
    pub fn with_backend(backend: B, limits: Limits) -> Result<Self> {
        registry::verify()?;
        let backend = Arc::new(backend);
        Ok(Self {
            store: Arc::new(DocStore::with_shared_backend(Arc::clone(&backend))),
            drafts: DraftStore::new(backend, limits.draft_backup_cap),
            limits,
            telegram: None,
        })
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn store(&self) -> &DocStore<B> {
        &self.store
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    fn current_date() -> NaiveDate {
        Self::now().date_naive()
    }

    // --- Documents ---

    /// Any registered document as JSON, by name (`tasks`, `kanban.json`, ...).
    pub fn show(&self, name: &str) -> Result<Value> {
        let kind: DocumentKind = name.parse()?;
        self.store.read_value(kind)
    }

    // --- Tasks ---

    pub fn tasks(&self) -> TasksDocument {
        tasks::list(self.store.as_ref())
    }

    pub fn tasks_for_date(&self, date: &str) -> Vec<Task> {
        tasks::for_date(self.store.as_ref(), date)
    }

    pub fn add_task(&self, new: tasks::NewTask) -> Result<TasksDocument> {
        tasks::add(self.store.as_ref(), new, Self::now())
    }

    pub fn update_task(&self, id: &str, patch: tasks::TaskPatch) -> Result<TasksDocument> {
        tasks::update(self.store.as_ref(), id, patch, Self::now())
    }

    pub fn delete_task(&self, id: &str) -> Result<TasksDocument> {
        tasks::delete(self.store.as_ref(), id)
    }

    // --- Kanban ---

    pub fn kanban(&self) -> KanbanDocument {
        kanban::board(self.store.as_ref())
    }

    pub fn add_card(&self, column: Option<&str>, new: kanban::NewCard) -> Result<KanbanDocument> {
        kanban::add_card(self.store.as_ref(), column, new, Self::now())
    }

    pub fn move_card(&self, mv: &kanban::CardMove) -> Result<KanbanDocument> {
        kanban::move_card(self.store.as_ref(), mv, self.limits.done_cap, Self::now())
    }

    pub fn update_card(&self, card_id: &str, patch: kanban::CardPatch) -> Result<KanbanDocument> {
        kanban::update_card(self.store.as_ref(), card_id, patch, Self::now())
    }

    pub fn archive_card(&self, column: &str, card_id: &str) -> Result<KanbanDocument> {
        kanban::archive_card(self.store.as_ref(), column, card_id)
    }

    pub fn restore_card(&self, card_id: &str) -> Result<KanbanDocument> {
        kanban::restore_card(self.store.as_ref(), card_id, Self::now())
    }

    pub fn add_label(&self, label: &str) -> Result<KanbanDocument> {
        kanban::add_label(self.store.as_ref(), label)
    }

    pub fn delete_label(&self, label: &str) -> Result<KanbanDocument> {
        kanban::delete_label(self.store.as_ref(), label)
    }

    // --- Content ---

    pub fn content(&self) -> ContentDocument {
        content::pipeline(self.store.as_ref())
    }

    pub fn add_piece(&self, new: content::NewPiece) -> Result<ContentDocument> {
        content::add_piece(self.store.as_ref(), new, Self::now())
    }

    pub fn update_piece(&self, id: &str, patch: content::PiecePatch) -> Result<ContentDocument> {
        content::update_piece(
            self.store.as_ref(),
            id,
            patch,
            self.limits.published_cap,
            Self::now(),
        )
    }

    pub fn archive_piece(&self, id: &str) -> Result<ContentDocument> {
        content::archive_piece(self.store.as_ref(), id)
    }

    pub fn restore_piece(&self, id: &str) -> Result<ContentDocument> {
        content::restore_piece(self.store.as_ref(), id)
    }

    pub fn delete_piece(&self, id: &str, from: PieceList) -> Result<ContentDocument> {
        content::delete_piece(self.store.as_ref(), id, from)
    }

    pub fn add_angle(&self, name: &str, color: Option<&str>) -> Result<ContentDocument> {
        content::add_angle(self.store.as_ref(), name, color)
    }

    pub fn update_angle(
        &self,
        id: &str,
        name: Option<String>,
        color: Option<String>,
    ) -> Result<ContentDocument> {
        content::update_angle(self.store.as_ref(), id, name, color)
    }

    pub fn delete_angle(&self, id: &str) -> Result<ContentDocument> {
        content::delete_angle(self.store.as_ref(), id)
    }

    // --- Drafts ---

    pub fn read_draft(&self, piece_id: &str, format: DraftFormat) -> Result<String> {
        self.drafts.read_draft(piece_id, format)
    }

    pub fn write_draft(&self, piece_id: &str, format: DraftFormat, text: &str) -> Result<()> {
        self.drafts.write_draft_with_backup(piece_id, format, text)
    }

    pub fn list_backups(&self, piece_id: &str, format: DraftFormat) -> Result<Vec<BackupInfo>> {
        self.drafts.list_backups(piece_id, format)
    }

    pub fn read_backup(&self, filename: &str) -> Result<String> {
        self.drafts.read_backup(filename)
    }

    // --- Ideas ---

    pub fn ideas(&self) -> IdeasDocument {
        ideas::inbox(self.store.as_ref())
    }

    pub fn add_idea(&self, new: ideas::NewIdea) -> Result<IdeasDocument> {
        ideas::add_idea(self.store.as_ref(), new, Self::now())
    }

    pub fn update_idea(&self, id: &str, patch: ideas::IdeaPatch) -> Result<IdeasDocument> {
        ideas::update_idea(self.store.as_ref(), id, patch, Self::now())
    }

    pub fn archive_idea(&self, id: &str) -> Result<IdeasDocument> {
        ideas::archive_idea(self.store.as_ref(), id, Self::now())
    }

    pub fn restore_idea(&self, id: &str) -> Result<IdeasDocument> {
        ideas::restore_idea(self.store.as_ref(), id, Self::now())
    }

    pub fn delete_archived_idea(&self, id: &str) -> Result<IdeasDocument> {
        ideas::delete_archived(self.store.as_ref(), id)
    }

    pub fn add_tag(&self, tag: &str) -> Result<IdeasDocument> {
        ideas::add_tag(self.store.as_ref(), tag)
    }

    pub fn delete_tag(&self, tag: &str) -> Result<IdeasDocument> {
        ideas::delete_tag(self.store.as_ref(), tag)
    }

    // --- Memory ---

    pub fn memory(&self) -> MemoryDocument {
        memory::log(self.store.as_ref())
    }

    pub fn add_memory(&self, new: memory::NewEntry) -> Result<MemoryDocument> {
        memory::add_entry(self.store.as_ref(), new, Self::now())
    }

    pub fn update_memory(&self, id: &str, patch: memory::EntryPatch) -> Result<MemoryDocument> {
        memory::update_entry(self.store.as_ref(), id, patch)
    }

    pub fn delete_memory(&self, id: &str) -> Result<MemoryDocument> {
        memory::delete_entry(self.store.as_ref(), id)
    }

    /// Entries inside the configured window.
    pub fn recent_memory(&self) -> Vec<MemoryEntry> {
        memory::recent(
            self.store.as_ref(),
            self.limits.memory_window_days,
            Self::current_date(),
        )
    }

    pub fn archive_stale_memory(&self) -> Result<MemoryDocument> {
        memory::archive_stale(
            self.store.as_ref(),
            self.limits.memory_window_days,
            Self::current_date(),
        )
    }

    pub fn memory_activity(&self, days: u32) -> Vec<(NaiveDate, usize)> {
        memory::activity(self.store.as_ref(), days, Self::current_date())
    }

    // --- Agenda ---

    pub fn agenda(&self) -> AgendaDocument {
        agenda::entries(self.store.as_ref())
    }

    pub fn upsert_agenda(&self, date: Option<&str>, notes: &str) -> Result<AgendaDocument> {
        agenda::upsert_notes(self.store.as_ref(), date, notes, Self::now())
    }

    pub fn update_agenda(&self, id: &str, patch: agenda::EntryPatch) -> Result<AgendaDocument> {
        agenda::update_entry(self.store.as_ref(), id, patch, Self::now())
    }

    fn calendar(&self) -> CachedCalendar<DocStore<B>> {
        CachedCalendar::new(Arc::clone(&self.store))
    }

    pub fn today(&self) -> TodayView {
        agenda::today(self.store.as_ref(), &self.calendar(), Self::now())
    }

    /// Deliver today's agenda through Telegram.
    pub fn send_agenda(&self) -> Result<SendReceipt> {
        let settings = self.telegram.as_ref().ok_or_else(|| {
            HqError::Config(
                "Telegram not configured: set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID".to_string(),
            )
        })?;
        let sink = TelegramSink::new(settings.token.as_str());
        self.send_agenda_via(&sink, &settings.chat_id)
    }

    /// Deliver today's agenda through any sink.
    pub fn send_agenda_via<M: MessageSink + ?Sized>(
        &self,
        sink: &M,
        chat_id: &str,
    ) -> Result<SendReceipt> {
        agenda::send_today(
            self.store.as_ref(),
            &self.calendar(),
            sink,
            chat_id,
            Self::now(),
        )
    }

    // --- Docs ---

    pub fn docs(&self) -> DocsDocument {
        docs::registry(self.store.as_ref())
    }

    pub fn doc_files(&self) -> Result<Vec<String>> {
        docs::list_files(self.store.backend())
    }

    pub fn read_doc(&self, filename: &str) -> Result<String> {
        docs::read_file(self.store.backend(), filename)
    }

    pub fn register_doc(&self, new: docs::NewDoc) -> Result<DocsDocument> {
        docs::register(self.store.as_ref(), self.store.backend(), new, Self::now())
    }

    pub fn update_doc(&self, id: &str, patch: docs::DocPatch) -> Result<DocsDocument> {
        docs::update(
            self.store.as_ref(),
            self.store.backend(),
            id,
            patch,
            Self::now(),
        )
    }

    pub fn delete_doc(&self, id: &str) -> Result<DocsDocument> {
        docs::delete(self.store.as_ref(), id)
    }

    // --- Analytics ---

    pub fn analytics(&self) -> AnalyticsDocument {
        analytics::report(self.store.as_ref())
    }

    pub fn add_analytics_entry(
        &self,
        platform: &str,
        entry: Map<String, Value>,
    ) -> Result<AnalyticsDocument> {
        analytics::add_entry(self.store.as_ref(), platform, entry, Self::now())
    }

    pub fn add_platform(&self, key: &str, name: &str) -> Result<AnalyticsDocument> {
        analytics::add_platform(self.store.as_ref(), key, name)
    }

    pub fn merge_analytics(&self, patch: Map<String, Value>) -> Result<AnalyticsDocument> {
        analytics::merge(self.store.as_ref(), patch)
    }

    // --- Sprint ---

    pub fn sprint(&self) -> SprintDocument {
        sprint::current(self.store.as_ref())
    }

    pub fn update_sprint(&self, patch: Map<String, Value>) -> Result<SprintDocument> {
        sprint::update(self.store.as_ref(), patch)
    }

    // --- Calendar ---

    pub fn calendar_cache(&self) -> CalendarCache {
        calendar::cache(self.store.as_ref())
    }

    pub fn calendar_events(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<CalendarEvent> {
        calendar::events(self.store.as_ref(), start, end)
    }

    pub fn replace_calendar(&self, events: Vec<CalendarEvent>) -> Result<CalendarCache> {
        calendar::replace_cache(self.store.as_ref(), events, Self::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::fakes::RecordingSink;
    use crate::store::mem_backend::MemBackend;

    fn make_api() -> HqApi<MemBackend> {
        HqApi::with_backend(MemBackend::new(), Limits::default()).unwrap()
    }

    #[test]
    fn show_reads_any_registered_document() {
        let api = make_api();
        let value = api.show("kanban.json").unwrap();
        assert_eq!(value["columns"].as_array().unwrap().len(), 4);
        assert!(api.show("nonsense").is_err());
    }

    #[test]
    fn drafts_share_the_document_backend() {
        let api = make_api();
        api.write_draft("p1", DraftFormat::Email, "v1").unwrap();
        api.write_draft("p1", DraftFormat::Email, "v2").unwrap();
        assert_eq!(api.read_draft("p1", DraftFormat::Email).unwrap(), "v2");
        assert_eq!(api.list_backups("p1", DraftFormat::Email).unwrap().len(), 1);
        assert!(api
            .store()
            .backend()
            .read(std::path::Path::new("drafts/p1-email.md"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn limits_flow_into_commands() {
        let api = HqApi::with_backend(
            MemBackend::new(),
            Limits {
                done_cap: 1,
                ..Limits::default()
            },
        )
        .unwrap();
        for title in ["a", "b"] {
            api.add_card(
                Some("done"),
                kanban::NewCard {
                    title: title.into(),
                    ..Default::default()
                },
            )
            .unwrap();
        }
        let review = api
            .add_card(
                Some("review"),
                kanban::NewCard {
                    title: "c".into(),
                    ..Default::default()
                },
            )
            .unwrap();
        let id = review.column("review").unwrap().cards[0].id.clone();

        let doc = api
            .move_card(&kanban::CardMove {
                card_id: id,
                from_column: "review".into(),
                to_column: "done".into(),
                to_index: 0,
            })
            .unwrap();
        assert_eq!(doc.done_cards().len(), 1);
        assert_eq!(doc.done_cards()[0].title, "c");
        assert_eq!(doc.archive.len(), 2);
    }

    #[test]
    fn send_agenda_requires_telegram_settings() {
        let api = make_api();
        assert!(matches!(api.send_agenda(), Err(HqError::Config(_))));

        let sink = RecordingSink::default();
        let receipt = api.send_agenda_via(&sink, "chat").unwrap();
        let today = crate::model::date_of(receipt.sent_at);
        assert!(receipt.agenda.entry_for(&today).unwrap().sent_to_telegram);
    }

    #[test]
    fn docs_and_drafts_land_under_the_data_dir() {
        let env = crate::test_utils::TestEnv::new();
        env.api
            .register_doc(docs::NewDoc {
                filename: "playbook.md".into(),
                content: Some("# Playbook".into()),
                ..Default::default()
            })
            .unwrap();
        env.api
            .write_draft("p9", DraftFormat::Youtube, "script")
            .unwrap();

        assert_eq!(env.api.doc_files().unwrap(), ["playbook.md"]);
        assert!(env.root.join("docs/playbook.md").exists());
        assert!(env.root.join("docs-registry.json").exists());
        assert!(env.root.join("drafts/p9-youtube.md").exists());
    }

    #[test]
    fn from_config_uses_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let api = HqApi::from_config(&HqConfig::with_data_dir(dir.path())).unwrap();
        api.add_task(tasks::NewTask {
            title: "hello".into(),
            ..Default::default()
        })
        .unwrap();
        assert!(dir.path().join("tasks.json").exists());
        assert_eq!(api.data_dir(), dir.path());
    }
}
