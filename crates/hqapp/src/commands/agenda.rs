//! Agenda commands: per-day notes, the "today" view, and delivery.
//!
//! Delivery is the one command with an external side effect. The agenda
//! entry is marked as sent only after the sink reports success, so a failed
//! send leaves `agenda.json` exactly as it was.

use super::apply;
use crate::collab::message::agenda_message;
use crate::collab::{events_or_empty, CalendarSource, MessageSink};
use crate::error::Result;
use crate::model::agenda::{AgendaDocument, AgendaEntry};
use crate::model::calendar::CalendarEvent;
use crate::model::tasks::{Task, TasksDocument};
use crate::model::{date_of, new_id};
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntryPatch {
    pub date: Option<String>,
    pub apollo_notes: Option<String>,
    pub sent_to_telegram: Option<bool>,
}

/// Everything the dashboard shows for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayView {
    pub date: String,
    pub agenda_entry: Option<AgendaEntry>,
    pub tasks: Vec<Task>,
    pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    pub sent_at: DateTime<Utc>,
    pub agenda: AgendaDocument,
}

fn blank_entry(date: &str, now: DateTime<Utc>) -> AgendaEntry {
    AgendaEntry {
        id: new_id(),
        date: date.to_string(),
        apollo_notes: String::new(),
        sent_to_telegram: false,
        sent_at: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

pub fn entries<S: DocumentStore>(store: &S) -> AgendaDocument {
    store.read()
}

/// Set the notes for `date` (default: today), creating the entry if needed.
pub fn upsert_notes<S: DocumentStore>(
    store: &S,
    date: Option<&str>,
    notes: &str,
    now: DateTime<Utc>,
) -> Result<AgendaDocument> {
    let date = date.map(str::to_string).unwrap_or_else(|| date_of(now));
    store.update(|mut doc: AgendaDocument| {
        match doc.entries.iter_mut().find(|e| e.date == date) {
            Some(entry) => {
                entry.apollo_notes = notes.to_string();
                entry.updated_at = now.into();
            }
            None => {
                let mut entry = blank_entry(&date, now);
                entry.apollo_notes = notes.to_string();
                doc.entries.push(entry);
            }
        }
        doc
    })
}

pub fn update_entry<S: DocumentStore>(
    store: &S,
    id: &str,
    patch: EntryPatch,
    now: DateTime<Utc>,
) -> Result<AgendaDocument> {
    store.update(|mut doc: AgendaDocument| {
        if let Some(entry) = doc.entries.iter_mut().find(|e| e.id == id) {
            apply(&mut entry.date, patch.date);
            apply(&mut entry.apollo_notes, patch.apollo_notes);
            apply(&mut entry.sent_to_telegram, patch.sent_to_telegram);
            entry.updated_at = now.into();
        }
        doc
    })
}

fn day_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let day = now.date_naive();
    let start = day.and_hms_opt(0, 0, 0).map(|d| d.and_utc());
    let end = day.and_hms_milli_opt(23, 59, 59, 999).map(|d| d.and_utc());
    (start.unwrap_or(now), end.unwrap_or(now))
}

/// Today's tasks, calendar events and agenda entry. Never fails: an
/// unavailable calendar shows as no events.
pub fn today<S: DocumentStore, C: CalendarSource + ?Sized>(
    store: &S,
    calendar: &C,
    now: DateTime<Utc>,
) -> TodayView {
    let date = date_of(now);
    let (start, end) = day_bounds(now);
    TodayView {
        tasks: store.read::<TasksDocument>().for_date(&date),
        events: events_or_empty(calendar, start, end),
        agenda_entry: store.read::<AgendaDocument>().entry_for(&date).cloned(),
        date,
    }
}

/// Build today's message, send it, then record the delivery.
///
/// The sink's error is returned untouched and nothing is written when the
/// send fails.
pub fn send_today<S, C, M>(
    store: &S,
    calendar: &C,
    sink: &M,
    chat_id: &str,
    now: DateTime<Utc>,
) -> Result<SendReceipt>
where
    S: DocumentStore,
    C: CalendarSource + ?Sized,
    M: MessageSink + ?Sized,
{
    let view = today(store, calendar, now);
    let notes = view
        .agenda_entry
        .as_ref()
        .map(|e| e.apollo_notes.as_str())
        .unwrap_or("");
    let text = agenda_message(now.date_naive(), &view.tasks, &view.events, notes);

    sink.send(chat_id, &text)?;
    info!(date = %view.date, "agenda delivered");

    let agenda = store.update(|mut doc: AgendaDocument| {
        let idx = match doc.entries.iter().position(|e| e.date == view.date) {
            Some(idx) => idx,
            None => {
                doc.entries.push(blank_entry(&view.date, now));
                doc.entries.len() - 1
            }
        };
        let entry = &mut doc.entries[idx];
        entry.sent_to_telegram = true;
        entry.sent_at = Some(now);
        entry.updated_at = now.into();
        doc
    })?;
    Ok(SendReceipt {
        sent_at: now,
        agenda,
    })
}
