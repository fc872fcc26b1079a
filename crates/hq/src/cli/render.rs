//! Output formatting.
//!
//! Documents and views are printed as pretty JSON so other tools can consume
//! them. Raw text (drafts, doc files) is printed as-is. Only a few listings
//! get a human layout.

use chrono::{DateTime, NaiveDate, Utc};
use hqapp::drafts::BackupInfo;
use serde::Serialize;

const TIME_WIDTH: usize = 16;

pub fn json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at).to_std().unwrap_or_default();
    timeago::Formatter::new().convert(elapsed)
}

/// One backup per line: file name, then how long ago it was saved.
pub fn backups(list: &[BackupInfo], now: DateTime<Utc>) -> String {
    if list.is_empty() {
        return "No backups.".to_string();
    }
    let name_width = list.iter().map(|b| b.filename.len()).max().unwrap_or(0);
    list.iter()
        .map(|b| {
            format!(
                "{:<name_width$}  {:>width$}",
                b.filename,
                time_ago(b.saved_at, now),
                width = TIME_WIDTH,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One day per line, oldest first, with a bar for the count.
pub fn activity(days: &[(NaiveDate, usize)]) -> String {
    days.iter()
        .map(|(day, count)| format!("{}  {:>3}  {}", day, count, "#".repeat(*count)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
    }

    #[test]
    fn backups_show_age() {
        let list = vec![BackupInfo {
            filename: "p1-email-2025-06-02T10-00-00.md".into(),
            saved_at: now() - Duration::hours(2),
        }];
        let out = backups(&list, now());
        assert!(out.starts_with("p1-email-2025-06-02T10-00-00.md"));
        assert!(out.contains("2 hours ago"));
    }

    #[test]
    fn empty_backups() {
        assert_eq!(backups(&[], now()), "No backups.");
    }

    #[test]
    fn activity_lines() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let out = activity(&[(day, 2), (day.succ_opt().unwrap(), 0)]);
        assert_eq!(out, "2025-06-01    2  ##\n2025-06-02    0  ");
    }
}
