//! Kanban board commands.
//!
//! The "done" column is a capped collection keyed on `updatedAt`: moving a
//! card into it may push the oldest done cards to the head of the archive.
//! Manual archival appends to the archive tail instead, and restore puts a
//! card back at the top of "done" without re-checking the cap.

use super::apply;
use crate::error::Result;
use crate::model::kanban::{Card, KanbanDocument, BACKLOG_COLUMN, DONE_COLUMN};
use crate::model::new_id;
use crate::policy::{archive_overflow, take_by_id, LabelSet};
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewCard {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub labels: Vec<String>,
    pub apollo_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub labels: Option<Vec<String>>,
    pub apollo_notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMove {
    pub card_id: String,
    pub from_column: String,
    pub to_column: String,
    /// Position in the target column, clamped to its length.
    pub to_index: usize,
}

pub fn board<S: DocumentStore>(store: &S) -> KanbanDocument {
    store.read()
}

/// Append a new card to `column` (default: backlog). Unknown columns are a no-op.
pub fn add_card<S: DocumentStore>(
    store: &S,
    column: Option<&str>,
    new: NewCard,
    now: DateTime<Utc>,
) -> Result<KanbanDocument> {
    let column = column.unwrap_or(BACKLOG_COLUMN);
    let card = Card {
        id: new_id(),
        title: new.title,
        description: new.description.unwrap_or_default(),
        priority: new
            .priority
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "medium".to_string()),
        created_at: now.into(),
        updated_at: now.into(),
        labels: new.labels,
        apollo_notes: new.apollo_notes.unwrap_or_default(),
        ..Default::default()
    };
    store.update(move |mut doc: KanbanDocument| {
        if let Some(col) = doc.column_mut(column) {
            col.cards.push(card);
        }
        doc
    })
}

/// Move a card between (or within) columns, then enforce the done cap.
pub fn move_card<S: DocumentStore>(
    store: &S,
    mv: &CardMove,
    done_cap: usize,
    now: DateTime<Utc>,
) -> Result<KanbanDocument> {
    store.update(|doc: KanbanDocument| apply_move(doc, mv, done_cap, now))
}

fn apply_move(
    mut doc: KanbanDocument,
    mv: &CardMove,
    done_cap: usize,
    now: DateTime<Utc>,
) -> KanbanDocument {
    if doc.column(&mv.to_column).is_none() {
        return doc;
    }
    let Some(from) = doc.column_mut(&mv.from_column) else {
        return doc;
    };
    let Some(mut card) = take_by_id(&mut from.cards, |c| c.id == mv.card_id) else {
        return doc;
    };
    card.updated_at = now.into();

    let KanbanDocument {
        columns, archive, ..
    } = &mut doc;
    if let Some(to) = columns.iter_mut().find(|c| c.id == mv.to_column) {
        let at = mv.to_index.min(to.cards.len());
        to.cards.insert(at, card);
        if to.id == DONE_COLUMN {
            archive_overflow(&mut to.cards, archive, done_cap, |c| c.updated_at.at());
        }
    }
    doc
}

pub fn update_card<S: DocumentStore>(
    store: &S,
    card_id: &str,
    patch: CardPatch,
    now: DateTime<Utc>,
) -> Result<KanbanDocument> {
    store.update(|mut doc: KanbanDocument| {
        let card = doc
            .columns
            .iter_mut()
            .flat_map(|col| col.cards.iter_mut())
            .find(|c| c.id == card_id);
        if let Some(card) = card {
            apply(&mut card.title, patch.title);
            apply(&mut card.description, patch.description);
            apply(&mut card.priority, patch.priority);
            apply(&mut card.labels, patch.labels);
            apply(&mut card.apollo_notes, patch.apollo_notes);
            card.updated_at = now.into();
        }
        doc
    })
}

/// Move a card from `column` to the tail of the archive.
pub fn archive_card<S: DocumentStore>(
    store: &S,
    column: &str,
    card_id: &str,
) -> Result<KanbanDocument> {
    store.update(|mut doc: KanbanDocument| {
        let card = doc
            .column_mut(column)
            .and_then(|col| take_by_id(&mut col.cards, |c| c.id == card_id));
        if let Some(card) = card {
            doc.archive.push(card);
        }
        doc
    })
}

/// Put an archived card back at the top of "done". The cap is not re-checked.
pub fn restore_card<S: DocumentStore>(
    store: &S,
    card_id: &str,
    now: DateTime<Utc>,
) -> Result<KanbanDocument> {
    store.update(|mut doc: KanbanDocument| {
        if doc.column(DONE_COLUMN).is_none() {
            return doc;
        }
        if let Some(mut card) = take_by_id(&mut doc.archive, |c| c.id == card_id) {
            card.updated_at = now.into();
            if let Some(done) = doc.column_mut(DONE_COLUMN) {
                done.cards.insert(0, card);
            }
        }
        doc
    })
}

pub fn add_label<S: DocumentStore>(store: &S, label: &str) -> Result<KanbanDocument> {
    store.update(|mut doc: KanbanDocument| {
        LabelSet::new(&mut doc.labels).add(label);
        doc
    })
}

pub fn delete_label<S: DocumentStore>(store: &S, label: &str) -> Result<KanbanDocument> {
    store.update(|mut doc: KanbanDocument| {
        LabelSet::new(&mut doc.labels).remove(label);
        doc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{make_store, t};
    use crate::model::Document;

    fn card(id: &str, at: DateTime<Utc>) -> Card {
        Card {
            id: id.to_string(),
            title: id.to_uppercase(),
            priority: "medium".to_string(),
            created_at: at.into(),
            updated_at: at.into(),
            ..Default::default()
        }
    }

    fn ids(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.id.as_str()).collect()
    }

    fn mv(card_id: &str, from: &str, to: &str, to_index: usize) -> CardMove {
        CardMove {
            card_id: card_id.to_string(),
            from_column: from.to_string(),
            to_column: to.to_string(),
            to_index,
        }
    }

    /// Board with t1..t6 in "done" and t7 in "review".
    fn seeded() -> crate::store::doc_store::DocStore<crate::store::mem_backend::MemBackend> {
        let store = make_store();
        let mut doc = KanbanDocument::default_document();
        doc.column_mut(DONE_COLUMN).unwrap().cards =
            (1..=6).map(|n| card(&format!("t{}", n), t(n))).collect();
        doc.column_mut("review").unwrap().cards = vec![card("t7", t(0))];
        store.write(doc).unwrap();
        store
    }

    #[test]
    fn moving_seventh_card_into_done_archives_oldest() {
        let store = seeded();

        let doc = move_card(&store, &mv("t7", "review", DONE_COLUMN, 0), 6, t(7)).unwrap();

        let mut live = ids(doc.done_cards());
        live.sort();
        assert_eq!(live, ["t2", "t3", "t4", "t5", "t6", "t7"]);
        assert_eq!(ids(&doc.archive), ["t1"]);
        assert!(doc.column("review").unwrap().cards.is_empty());
    }

    #[test]
    fn overflow_lands_at_archive_head() {
        let store = seeded();
        store
            .update(|mut doc: KanbanDocument| {
                doc.archive.push(card("ancient", t(-10)));
                doc
            })
            .unwrap();

        let doc = move_card(&store, &mv("t7", "review", DONE_COLUMN, 6), 6, t(7)).unwrap();
        assert_eq!(ids(&doc.archive), ["t1", "ancient"]);
    }

    #[test]
    fn move_within_non_done_columns_never_archives() {
        let store = make_store();
        let doc = add_card(&store, None, NewCard::default(), t(0)).unwrap();
        let id = doc.columns[0].cards[0].id.clone();

        let doc = move_card(&store, &mv(&id, BACKLOG_COLUMN, "in-progress", 99), 0, t(1)).unwrap();
        assert_eq!(doc.column("in-progress").unwrap().cards[0].updated_at, t(1));
        assert!(doc.archive.is_empty());
    }

    #[test]
    fn move_with_unknown_target_keeps_card() {
        let store = seeded();
        let doc = move_card(&store, &mv("t7", "review", "nowhere", 0), 6, t(7)).unwrap();
        assert_eq!(ids(&doc.column("review").unwrap().cards), ["t7"]);
    }

    #[test]
    fn restore_does_not_recheck_cap() {
        let store = seeded();
        move_card(&store, &mv("t7", "review", DONE_COLUMN, 0), 6, t(7)).unwrap();

        let doc = restore_card(&store, "t1", t(8)).unwrap();
        assert_eq!(doc.done_cards().len(), 7);
        assert_eq!(doc.done_cards()[0].id, "t1");
        assert_eq!(doc.done_cards()[0].updated_at, t(8));
        assert!(doc.archive.is_empty());
    }

    #[test]
    fn restore_unknown_id_is_noop() {
        let store = seeded();
        let before: KanbanDocument = store.read();
        let doc = restore_card(&store, "missing", t(8)).unwrap();
        assert_eq!(doc.columns, before.columns);
        assert_eq!(doc.archive, before.archive);
    }

    #[test]
    fn restoring_twice_does_not_duplicate() {
        let store = seeded();
        move_card(&store, &mv("t7", "review", DONE_COLUMN, 0), 6, t(7)).unwrap();
        restore_card(&store, "t1", t(8)).unwrap();
        let doc = restore_card(&store, "t1", t(9)).unwrap();

        let count = doc.done_cards().iter().filter(|c| c.id == "t1").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn archive_card_appends_to_tail() {
        let store = seeded();
        store
            .update(|mut doc: KanbanDocument| {
                doc.archive.push(card("older", t(-1)));
                doc
            })
            .unwrap();

        let doc = archive_card(&store, DONE_COLUMN, "t3").unwrap();
        assert_eq!(ids(&doc.archive), ["older", "t3"]);
        assert_eq!(doc.done_cards().len(), 5);

        let again = archive_card(&store, "review", "t3").unwrap();
        assert_eq!(again.archive.len(), 2);
    }

    #[test]
    fn update_card_patches_and_stamps() {
        let store = make_store();
        let doc = add_card(
            &store,
            Some("review"),
            NewCard {
                title: "Draft".into(),
                ..Default::default()
            },
            t(0),
        )
        .unwrap();
        let id = doc.column("review").unwrap().cards[0].id.clone();

        let doc = update_card(
            &store,
            &id,
            CardPatch {
                title: Some("Final".into()),
                ..Default::default()
            },
            t(2),
        )
        .unwrap();
        let card = &doc.column("review").unwrap().cards[0];
        assert_eq!(card.title, "Final");
        assert_eq!(card.priority, "medium");
        assert_eq!(card.updated_at, t(2));
        assert_eq!(card.created_at, t(0));
    }

    #[test]
    fn labels_are_normalized_and_unique() {
        let store = make_store();
        add_label(&store, "Launch").unwrap();
        let doc = add_label(&store, "launch").unwrap();
        assert_eq!(doc.labels.iter().filter(|l| *l == "launch").count(), 1);

        let doc = delete_label(&store, "LAUNCH").unwrap();
        assert!(!doc.labels.contains(&"launch".to_string()));
        let doc = delete_label(&store, "never-there").unwrap();
        assert_eq!(doc.labels.len(), 4);
    }

    #[test]
    fn research_label_is_kept_once() {
        let store = make_store();
        store
            .write(KanbanDocument {
                labels: vec!["admin".into()],
                ..KanbanDocument::default_document()
            })
            .unwrap();
        add_label(&store, "Research").unwrap();
        let doc = add_label(&store, "research").unwrap();
        assert_eq!(doc.labels, ["admin", "research"]);
    }
}
