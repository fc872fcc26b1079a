//! Task list document (`tasks.json`).
//!
//! Tasks are also written by an external agent, sometimes with an older
//! schema that tracked completion as `done: bool`. Every task is normalized
//! while it is deserialized, so all read paths see the same shape:
//!
//! - `status`: explicit value, else `"done"` when the legacy flag is true, else `"todo"`
//! - `priority`: defaults to `"medium"`
//! - `category`: defaults to [`DEFAULT_CATEGORY`]

use super::lenient;
use super::{Document, DocumentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATUS_TODO: &str = "todo";
pub const STATUS_DONE: &str = "done";
pub const DEFAULT_PRIORITY: &str = "medium";
pub const DEFAULT_CATEGORY: &str = "deeper-prime";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub date: String,
    pub priority: String,
    pub status: String,
    pub category: String,
    pub notes: String,
    pub created_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Fields HQ does not know about, kept through read-modify-write.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == STATUS_DONE
    }
}

// Normalizes legacy and externally-authored records on the way in.
impl<'de> Deserialize<'de> for Task {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let helper = TaskHelper::deserialize(deserializer)?;

        let status = non_empty(helper.status).unwrap_or_else(|| {
            if helper.done == Some(true) {
                STATUS_DONE.to_string()
            } else {
                STATUS_TODO.to_string()
            }
        });

        Ok(Task {
            id: helper.id,
            title: helper.title,
            date: helper.date,
            priority: non_empty(helper.priority).unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
            status,
            category: non_empty(helper.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            notes: helper.notes.unwrap_or_default(),
            created_at: helper.created_at,
            completed_at: helper.completed_at,
            extra: helper.extra,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskHelper {
    #[serde(default, deserialize_with = "lenient::string")]
    id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    date: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    priority: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    done: Option<bool>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    completed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksDocument {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub tasks: Vec<Task>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TasksDocument {
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks scheduled for a calendar date, in list order.
    pub fn for_date(&self, date: &str) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.date == date).cloned().collect()
    }
}

impl Document for TasksDocument {
    const KIND: DocumentKind = DocumentKind::Tasks;

    fn default_document() -> Self {
        Self {
            tasks: Vec::new(),
            last_modified: None,
            extra: Map::new(),
        }
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    fn set_last_modified(&mut self, at: DateTime<Utc>) {
        self.last_modified = Some(at);
    }
}
