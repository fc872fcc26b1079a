//! Content pipeline document (`content-pipeline.json`).
//!
//! A piece moves through stages (`idea` → ... → `ready` → `published`) and
//! tracks per-channel publishing state under `formats`. Only published pieces
//! count towards the published cap; see [`crate::commands::content`].

use super::lenient::{self, Stamp};
use super::{Document, DocumentKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const STAGE_IDEA: &str = "idea";
pub const STAGE_READY: &str = "ready";
pub const STAGE_PUBLISHED: &str = "published";
pub const CHANNELS: [&str; 5] = ["linkedin", "youtube", "email", "twitter", "instagram"];
pub const DEFAULT_ANGLE_COLOR: &str = "#D97706";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatEntry {
    #[serde(deserialize_with = "lenient::string")]
    pub status: String,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub publish_date: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub url: String,
}

impl Default for FormatEntry {
    fn default() -> Self {
        Self {
            status: "not-started".to_string(),
            publish_date: None,
            url: String::new(),
        }
    }
}

pub fn default_formats() -> BTreeMap<String, FormatEntry> {
    CHANNELS
        .iter()
        .map(|c| (c.to_string(), FormatEntry::default()))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentPiece {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub angle: String,
    #[serde(deserialize_with = "lenient::string")]
    pub stage: String,
    #[serde(deserialize_with = "formats")]
    pub formats: BTreeMap<String, FormatEntry>,
    #[serde(deserialize_with = "lenient::string")]
    pub core_idea: String,
    #[serde(deserialize_with = "lenient::string")]
    pub notes: String,
    #[serde(deserialize_with = "lenient::int")]
    pub week_number: i32,
    pub created_at: Stamp,
    #[serde(deserialize_with = "lenient::timestamp")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// A `null` map or channel reads as not started.
fn formats<'de, D>(deserializer: D) -> Result<BTreeMap<String, FormatEntry>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: BTreeMap<String, Option<FormatEntry>> = lenient::or_default(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(channel, entry)| (channel, entry.unwrap_or_default()))
        .collect())
}

impl ContentPiece {
    pub fn is_published(&self) -> bool {
        self.stage == STAGE_PUBLISHED
    }

    /// Age used by the published cap: publish time, else creation time.
    pub fn published_or_created(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at.at())
    }

    fn fill_channels(&mut self) {
        for channel in CHANNELS {
            self.formats.entry(channel.to_string()).or_default();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Angle {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub content: Vec<ContentPiece>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub archive: Vec<ContentPiece>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub angles: Vec<Angle>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentDocument {
    pub fn piece(&self, id: &str) -> Option<&ContentPiece> {
        self.content.iter().find(|p| p.id == id)
    }

    pub fn published_count(&self) -> usize {
        self.content.iter().filter(|p| p.is_published()).count()
    }
}

impl Document for ContentDocument {
    const KIND: DocumentKind = DocumentKind::ContentPipeline;

    fn default_document() -> Self {
        Self {
            content: Vec::new(),
            archive: Vec::new(),
            angles: Vec::new(),
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

    fn normalized(mut self) -> Self {
        for piece in &mut self.content {
            piece.fill_channels();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_fills_missing_channels() {
        let doc: ContentDocument = serde_json::from_str(
            r#"{"content": [{"id": "p1", "stage": "idea",
                 "formats": {"linkedin": {"status": "drafted", "publishDate": null, "url": ""}}}]}"#,
        )
        .unwrap();
        let doc = doc.normalized();
        let formats = &doc.content[0].formats;
        assert_eq!(formats.len(), CHANNELS.len());
        assert_eq!(formats["linkedin"].status, "drafted");
        assert_eq!(formats["youtube"], FormatEntry::default());
    }

    #[test]
    fn off_schema_piece_fields_are_coerced() {
        let doc: ContentDocument = serde_json::from_str(
            r#"{"content": [{"id": "p1", "weekNumber": "14", "formats": {"email": null},
                 "createdAt": "sometime", "series": "launch"}], "angles": null}"#,
        )
        .unwrap();
        let piece = &doc.content[0];
        assert_eq!(piece.week_number, 14);
        assert_eq!(piece.formats["email"], FormatEntry::default());
        assert!(doc.angles.is_empty());

        let back = serde_json::to_value(piece).unwrap();
        assert_eq!(back["createdAt"], "sometime");
        assert_eq!(back["series"], "launch");
    }

    #[test]
    fn published_or_created_falls_back() {
        let created = DateTime::<Utc>::default() + chrono::Duration::days(1);
        let mut piece = ContentPiece {
            created_at: created.into(),
            ..Default::default()
        };
        assert_eq!(piece.published_or_created(), created);
        let later = created + chrono::Duration::days(3);
        piece.published_at = Some(later);
        assert_eq!(piece.published_or_created(), later);
    }
}
