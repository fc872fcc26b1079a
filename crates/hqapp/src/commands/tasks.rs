use super::apply;
use crate::error::Result;
use crate::model::tasks::{
    Task, TasksDocument, DEFAULT_CATEGORY, DEFAULT_PRIORITY, STATUS_DONE, STATUS_TODO,
};
use crate::model::{date_of, new_id};
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub date: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskPatch {
    pub title: Option<String>,
    pub date: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub fn list<S: DocumentStore>(store: &S) -> TasksDocument {
    store.read()
}

/// Tasks scheduled for `date` (`YYYY-MM-DD`).
pub fn for_date<S: DocumentStore>(store: &S, date: &str) -> Vec<Task> {
    store.read::<TasksDocument>().for_date(date)
}

pub fn add<S: DocumentStore>(store: &S, new: NewTask, now: DateTime<Utc>) -> Result<TasksDocument> {
    let status = or_default(new.status, STATUS_TODO);
    let task = Task {
        id: new_id(),
        title: new.title,
        date: new.date.filter(|d| !d.is_empty()).unwrap_or_else(|| date_of(now)),
        priority: or_default(new.priority, DEFAULT_PRIORITY),
        completed_at: (status == STATUS_DONE).then_some(now),
        status,
        category: or_default(new.category, DEFAULT_CATEGORY),
        notes: new.notes.unwrap_or_default(),
        created_at: Some(now),
        extra: Default::default(),
    };
    store.update(move |mut doc: TasksDocument| {
        doc.tasks.push(task);
        doc
    })
}

/// Apply `patch` to task `id`.
///
/// A patch setting status "done" stamps `completedAt`, even when the task was
/// already done. Any other status clears it. Patches that leave the status
/// alone keep the stamp.
pub fn update<S: DocumentStore>(
    store: &S,
    id: &str,
    patch: TaskPatch,
    now: DateTime<Utc>,
) -> Result<TasksDocument> {
    store.update(|mut doc: TasksDocument| {
        if let Some(task) = doc.tasks.iter_mut().find(|t| t.id == id) {
            let marks_done = patch.status.as_deref() == Some(STATUS_DONE);
            apply(&mut task.title, patch.title);
            apply(&mut task.date, patch.date);
            apply(&mut task.priority, patch.priority);
            apply(&mut task.status, patch.status);
            apply(&mut task.category, patch.category);
            apply(&mut task.notes, patch.notes);

            if marks_done {
                task.completed_at = Some(now);
            } else if !task.is_done() {
                task.completed_at = None;
            }
        }
        doc
    })
}

pub fn delete<S: DocumentStore>(store: &S, id: &str) -> Result<TasksDocument> {
    store.update(|mut doc: TasksDocument| {
        doc.tasks.retain(|t| t.id != id);
        doc
    })
}
