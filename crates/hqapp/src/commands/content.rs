//! Content pipeline commands.
//!
//! Published pieces form a capped collection inside `content`: pieces in any
//! other stage are never counted or archived by the cap. The cap key is
//! `publishedAt`, falling back to `createdAt` for pieces published by an
//! external writer without a stamp.

use super::apply;
use crate::error::Result;
use crate::model::content::{
    default_formats, Angle, ContentDocument, ContentPiece, FormatEntry, DEFAULT_ANGLE_COLOR,
    STAGE_IDEA, STAGE_PUBLISHED, STAGE_READY,
};
use crate::model::new_id;
use crate::policy::capped::archive_overflow_where;
use crate::policy::take_by_id;
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewPiece {
    pub title: String,
    pub angle: String,
    pub stage: Option<String>,
    pub formats: Option<BTreeMap<String, FormatEntry>>,
    pub core_idea: String,
    pub notes: String,
    pub week_number: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PiecePatch {
    pub title: Option<String>,
    pub angle: Option<String>,
    pub stage: Option<String>,
    pub formats: Option<BTreeMap<String, FormatEntry>>,
    pub core_idea: Option<String>,
    pub notes: Option<String>,
    pub week_number: Option<i32>,
}

/// Which list a delete applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceList {
    Content,
    Archive,
}

pub fn pipeline<S: DocumentStore>(store: &S) -> ContentDocument {
    store.read()
}

pub fn add_piece<S: DocumentStore>(
    store: &S,
    new: NewPiece,
    now: DateTime<Utc>,
) -> Result<ContentDocument> {
    let piece = ContentPiece {
        id: new_id(),
        title: new.title,
        angle: new.angle,
        stage: new
            .stage
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| STAGE_IDEA.to_string()),
        formats: new.formats.unwrap_or_else(default_formats),
        core_idea: new.core_idea,
        notes: new.notes,
        week_number: new.week_number,
        created_at: now.into(),
        published_at: None,
        ..Default::default()
    };
    store.update(move |mut doc: ContentDocument| {
        doc.content.push(piece);
        doc
    })
}

/// Patch a piece. Publishing from another stage stamps `publishedAt`; any
/// patch that sets the stage to published enforces the cap.
pub fn update_piece<S: DocumentStore>(
    store: &S,
    id: &str,
    patch: PiecePatch,
    published_cap: usize,
    now: DateTime<Utc>,
) -> Result<ContentDocument> {
    store.update(|doc: ContentDocument| apply_update(doc, id, patch, published_cap, now))
}

fn apply_update(
    mut doc: ContentDocument,
    id: &str,
    patch: PiecePatch,
    published_cap: usize,
    now: DateTime<Utc>,
) -> ContentDocument {
    let Some(piece) = doc.content.iter_mut().find(|p| p.id == id) else {
        return doc;
    };
    let was_published = piece.is_published();
    let publishing = patch.stage.as_deref() == Some(STAGE_PUBLISHED);

    apply(&mut piece.title, patch.title);
    apply(&mut piece.angle, patch.angle);
    apply(&mut piece.stage, patch.stage);
    apply(&mut piece.formats, patch.formats);
    apply(&mut piece.core_idea, patch.core_idea);
    apply(&mut piece.notes, patch.notes);
    apply(&mut piece.week_number, patch.week_number);

    if publishing && !was_published {
        piece.published_at = Some(now);
    }
    if publishing {
        archive_overflow_where(
            &mut doc.content,
            &mut doc.archive,
            published_cap,
            ContentPiece::is_published,
            ContentPiece::published_or_created,
        );
    }
    doc
}

/// Move a piece from the pipeline to the head of the archive.
pub fn archive_piece<S: DocumentStore>(store: &S, id: &str) -> Result<ContentDocument> {
    store.update(|mut doc: ContentDocument| {
        if let Some(piece) = take_by_id(&mut doc.content, |p| p.id == id) {
            doc.archive.insert(0, piece);
        }
        doc
    })
}

/// Bring an archived piece back as "ready", unpublished, at the end of the
/// pipeline. The cap is not re-checked.
pub fn restore_piece<S: DocumentStore>(store: &S, id: &str) -> Result<ContentDocument> {
    store.update(|mut doc: ContentDocument| {
        if let Some(mut piece) = take_by_id(&mut doc.archive, |p| p.id == id) {
            piece.stage = STAGE_READY.to_string();
            piece.published_at = None;
            doc.content.push(piece);
        }
        doc
    })
}

pub fn delete_piece<S: DocumentStore>(
    store: &S,
    id: &str,
    from: PieceList,
) -> Result<ContentDocument> {
    store.update(|mut doc: ContentDocument| {
        let list = match from {
            PieceList::Content => &mut doc.content,
            PieceList::Archive => &mut doc.archive,
        };
        list.retain(|p| p.id != id);
        doc
    })
}

pub fn add_angle<S: DocumentStore>(
    store: &S,
    name: &str,
    color: Option<&str>,
) -> Result<ContentDocument> {
    let angle = Angle {
        id: new_id(),
        name: name.to_string(),
        color: color
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_ANGLE_COLOR)
            .to_string(),
    };
    store.update(move |mut doc: ContentDocument| {
        doc.angles.push(angle);
        doc
    })
}

pub fn update_angle<S: DocumentStore>(
    store: &S,
    id: &str,
    name: Option<String>,
    color: Option<String>,
) -> Result<ContentDocument> {
    store.update(|mut doc: ContentDocument| {
        if let Some(angle) = doc.angles.iter_mut().find(|a| a.id == id) {
            apply(&mut angle.name, name);
            apply(&mut angle.color, color);
        }
        doc
    })
}

pub fn delete_angle<S: DocumentStore>(store: &S, id: &str) -> Result<ContentDocument> {
    store.update(|mut doc: ContentDocument| {
        doc.angles.retain(|a| a.id != id);
        doc
    })
}
