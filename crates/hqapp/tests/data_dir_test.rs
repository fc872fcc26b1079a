//! The library against a real data directory.

use chrono::{Duration, TimeZone, Utc};
use hqapp::commands::kanban::{CardMove, NewCard};
use hqapp::commands::tasks::{self, NewTask};
use hqapp::drafts::{DraftFormat, DraftStore};
use hqapp::model::kanban::KanbanDocument;
use hqapp::model::tasks::TasksDocument;
use hqapp::model::Document;
use hqapp::store::doc_store::DocStore;
use hqapp::store::fs_backend::FsBackend;
use hqapp::store::DocumentStore;
use hqapp::{HqApi, HqConfig, HqError, Limits};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn open(dir: &TempDir) -> HqApi<FsBackend> {
    HqApi::from_config(&HqConfig::with_data_dir(dir.path())).unwrap()
}

#[test]
fn documents_survive_reopening() {
    let dir = TempDir::new().unwrap();
    {
        let api = open(&dir);
        api.add_task(NewTask {
            title: "Record intro".into(),
            ..Default::default()
        })
        .unwrap();
    }

    let api = open(&dir);
    let tasks = api.tasks();
    assert_eq!(tasks.tasks.len(), 1);
    assert_eq!(tasks.tasks[0].title, "Record intro");
    assert!(tasks.last_modified.is_some());

    let raw = fs::read_to_string(dir.path().join("tasks.json")).unwrap();
    assert!(raw.contains("\"lastModified\""));
}

#[test]
fn corrupt_document_reads_as_default_but_is_never_overwritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kanban.json");
    fs::write(&path, "{ not json").unwrap();

    let api = open(&dir);
    assert_eq!(api.kanban(), KanbanDocument::default_document());

    let result = api.add_card(
        None,
        NewCard {
            title: "Fix intro".into(),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(HqError::Store(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
}

#[test]
fn off_schema_card_survives_an_update() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("kanban.json"),
        r#"{"columns": [{"id": "backlog", "title": "Backlog", "cards": [
            {"id": "keep", "title": "Keep me", "labels": null,
             "updatedAt": "someday", "owner": "apollo"}
        ]}], "labels": []}"#,
    )
    .unwrap();

    let api = open(&dir);
    let board = api
        .add_card(
            None,
            NewCard {
                title: "Fix intro".into(),
                ..Default::default()
            },
        )
        .unwrap();
    let backlog = board.column("backlog").unwrap();
    assert_eq!(backlog.cards.len(), 2);
    assert_eq!(backlog.cards[0].id, "keep");

    let raw = fs::read_to_string(dir.path().join("kanban.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let kept = &parsed["columns"][0]["cards"][0];
    assert_eq!(kept["updatedAt"], "someday");
    assert_eq!(kept["owner"], "apollo");
    assert_eq!(kept["labels"], serde_json::json!([]));
}

#[test]
fn tasks_with_off_schema_fields_survive_an_add() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("tasks.json"),
        r#"{"tasks": [{"id": "a", "notes": 5}, {"id": "b"}]}"#,
    )
    .unwrap();

    let api = open(&dir);
    let doc = api
        .add_task(NewTask {
            title: "Call".into(),
            ..Default::default()
        })
        .unwrap();
    let ids: Vec<&str> = doc.tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(&ids[..2], &["a", "b"]);
}

#[test]
fn concurrent_updates_do_not_lose_writes() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(DocStore::with_backend(FsBackend::new(dir.path())));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                tasks::add(
                    store.as_ref(),
                    NewTask {
                        title: format!("task {}", i),
                        ..Default::default()
                    },
                    Utc::now(),
                )
                .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let doc: TasksDocument = store.read();
    assert_eq!(doc.tasks.len(), 8);
}

#[test]
fn done_cap_holds_on_disk() {
    let dir = TempDir::new().unwrap();
    let api = HqApi::with_backend(
        FsBackend::new(dir.path()),
        Limits {
            done_cap: 2,
            ..Limits::default()
        },
    )
    .unwrap();

    for n in 0..4 {
        let board = api
            .add_card(
                Some("review"),
                NewCard {
                    title: format!("card {}", n),
                    ..Default::default()
                },
            )
            .unwrap();
        let id = board.column("review").unwrap().cards[0].id.clone();
        api.move_card(&CardMove {
            card_id: id,
            from_column: "review".into(),
            to_column: "done".into(),
            to_index: 0,
        })
        .unwrap();
    }

    let reopened = open(&dir).kanban();
    let done: Vec<_> = reopened.done_cards().iter().map(|c| c.title.as_str()).collect();
    assert_eq!(done, ["card 3", "card 2"]);
    assert_eq!(reopened.archive.len(), 2);
}

#[test]
fn draft_backups_on_disk() {
    let dir = TempDir::new().unwrap();
    let drafts = DraftStore::new(Arc::new(FsBackend::new(dir.path())), 3);
    let start = Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap();

    for n in 0..6 {
        drafts
            .write_draft_with_backup_at(
                "piece-1",
                DraftFormat::Linkedin,
                &format!("v{}", n),
                start + Duration::minutes(n),
            )
            .unwrap();
    }
    // Same text again: no new backup.
    drafts
        .write_draft_with_backup_at(
            "piece-1",
            DraftFormat::Linkedin,
            "  v5\n",
            start + Duration::minutes(10),
        )
        .unwrap();

    let backups = drafts
        .list_backups("piece-1", DraftFormat::Linkedin)
        .unwrap();
    assert_eq!(backups.len(), 3);
    assert_eq!(backups[0].filename, "piece-1-linkedin-2025-06-02T08-05-00.md");
    assert_eq!(drafts.read_backup(&backups[0].filename).unwrap(), "v4");
    assert_eq!(drafts.read_backup(&backups[2].filename).unwrap(), "v2");

    // A sync conflict copy is neither listed nor pruned.
    let conflict = dir
        .path()
        .join("drafts/backups/piece-1-linkedin-2025-06-02T08-00-00.sync-conflict-x.md");
    fs::write(&conflict, "conflict").unwrap();
    drafts
        .write_draft_with_backup_at(
            "piece-1",
            DraftFormat::Linkedin,
            "v6",
            start + Duration::minutes(20),
        )
        .unwrap();
    assert!(conflict.exists());
    assert_eq!(
        drafts
            .list_backups("piece-1", DraftFormat::Linkedin)
            .unwrap()
            .len(),
        3
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("drafts/piece-1-linkedin.md")).unwrap(),
        "v6"
    );
}
