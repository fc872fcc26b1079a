//! Forgiving deserializers for records written outside HQ.
//!
//! An off-schema value in one record must never make the whole document
//! unparsable: the store would fall back to the default and lose every other
//! record. Scalars are coerced, `null` reads as the field default, and
//! timestamps that do not parse keep their raw value.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Parse RFC 3339, or a bare `YYYY-MM-DD` taken as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Optional timestamp: null, missing, or malformed all become `None`.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

/// A required record timestamp.
///
/// A value that does not parse is kept verbatim and written back unchanged.
/// For ordering it counts as the epoch, so such records sort first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stamp {
    at: DateTime<Utc>,
    raw: Option<Value>,
}

impl Stamp {
    /// The instant used for ordering and display.
    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    /// The unparsed on-disk value, if the stored one was malformed.
    pub fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }
}

impl From<DateTime<Utc>> for Stamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self { at, raw: None }
    }
}

impl PartialEq<DateTime<Utc>> for Stamp {
    fn eq(&self, other: &DateTime<Utc>) -> bool {
        self.raw.is_none() && self.at == *other
    }
}

impl Serialize for Stamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.raw {
            Some(raw) => raw.serialize(serializer),
            None => self.at.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Stamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            None | Some(Value::Null) => Stamp::default(),
            Some(value) => match value.as_str().and_then(parse_timestamp) {
                Some(at) => Stamp::from(at),
                None => Stamp {
                    at: DateTime::<Utc>::default(),
                    raw: Some(value),
                },
            },
        })
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// String that tolerates `null` and non-string values.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(scalar_text).unwrap_or_default())
}

/// Like [`string`], keeping `null` as `None`.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(scalar_text))
}

/// A flag written as a bool or as `"true"` / `"false"`; anything else is `None`.
pub fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}

/// [`flag`] defaulting to `false`.
pub fn boolean<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(flag(deserializer)?.unwrap_or(false))
}

/// Integer written as a number or numeric string; anything else is `0`.
pub fn int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let n = match raw {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(n.and_then(|n| i32::try_from(n).ok()).unwrap_or(0))
}

/// `null` reads as the type's default; anything else must parse as `T`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(D::Error::custom),
    }
}

/// Label or tag list: `null` is empty, a lone string is a one-item list,
/// scalar items are coerced and `null` items dropped.
pub fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.into_iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(other).into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "timestamp")]
        at: Option<DateTime<Utc>>,
        #[serde(default)]
        required: Stamp,
        #[serde(default, deserialize_with = "string")]
        text: String,
        #[serde(default, deserialize_with = "opt_string")]
        note: Option<String>,
        #[serde(default, deserialize_with = "strings")]
        labels: Vec<String>,
        #[serde(default, deserialize_with = "or_default")]
        items: Vec<u32>,
        #[serde(default, deserialize_with = "int")]
        week: i32,
        #[serde(default, deserialize_with = "boolean")]
        sent: bool,
    }

    fn parse(json: &str) -> Record {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn accepts_rfc3339_and_bare_dates() {
        assert_eq!(
            parse_timestamp("2025-01-02T03:04:05.000Z"),
            Some(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap())
        );
        assert_eq!(
            parse_timestamp("2025-01-02"),
            Some(Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn malformed_values_degrade_instead_of_failing() {
        let record = parse(r#"{"at": "soon", "required": 42, "text": null}"#);
        assert_eq!(record.at, None);
        assert_eq!(record.required.at(), DateTime::<Utc>::default());
        assert_eq!(record.text, "");

        assert_eq!(parse(r#"{"text": 7}"#).text, "7");
        assert_eq!(parse(r#"{"note": 5}"#).note.as_deref(), Some("5"));
        assert_eq!(parse(r#"{"note": null}"#).note, None);
    }

    #[test]
    fn null_collections_read_as_empty() {
        let record = parse(r#"{"labels": null, "items": null}"#);
        assert!(record.labels.is_empty());
        assert!(record.items.is_empty());
    }

    #[test]
    fn label_lists_coerce_items() {
        let record = parse(r#"{"labels": ["a", 3, null, true]}"#);
        assert_eq!(record.labels, vec!["a", "3", "true"]);
        assert_eq!(parse(r#"{"labels": "solo"}"#).labels, vec!["solo"]);
    }

    #[test]
    fn numbers_and_flags_accept_strings() {
        let record = parse(r#"{"week": "12", "sent": "true"}"#);
        assert_eq!(record.week, 12);
        assert!(record.sent);
        let record = parse(r#"{"week": "soon", "sent": 1}"#);
        assert_eq!(record.week, 0);
        assert!(!record.sent);
    }

    #[test]
    fn malformed_stamp_is_written_back_verbatim() {
        let record = parse(r#"{"required": "last tuesday"}"#);
        assert_eq!(record.required.raw(), Some(&Value::from("last tuesday")));
        assert_eq!(
            serde_json::to_value(&record.required).unwrap(),
            Value::from("last tuesday")
        );

        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let record = parse(r#"{"required": "2025-01-02T03:04:05Z"}"#);
        assert_eq!(record.required, at);
        let back: Stamp = serde_json::from_value(serde_json::to_value(&record.required).unwrap())
            .unwrap();
        assert_eq!(back, at);
    }
}
