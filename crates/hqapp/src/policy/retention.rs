//! Memory log retention window.
//!
//! The window is the last `days` calendar days, inclusive of `today`.
//! Entries are compared by their `date` field (`YYYY-MM-DD`); entries with an
//! unparsable date are treated as inside the window so they are never
//! archived by accident.

use crate::model::memory::MemoryEntry;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

/// Longest window honored, about ten years. Larger values are clamped.
pub const MAX_WINDOW_DAYS: u32 = 3660;

/// First calendar day inside a window of `days` ending at `today`.
pub fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    let span = Duration::days(i64::from(days.clamp(1, MAX_WINDOW_DAYS)) - 1);
    today.checked_sub_signed(span).unwrap_or(NaiveDate::MIN)
}

fn entry_date(entry: &MemoryEntry) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d").ok()
}

pub fn in_window(entry: &MemoryEntry, today: NaiveDate, days: u32) -> bool {
    entry_date(entry).is_none_or(|d| d >= window_start(today, days))
}

/// Split entries into (inside window, older), both in original order.
pub fn partition(
    entries: Vec<MemoryEntry>,
    today: NaiveDate,
    days: u32,
) -> (Vec<MemoryEntry>, Vec<MemoryEntry>) {
    entries
        .into_iter()
        .partition(|entry| in_window(entry, today, days))
}

/// Entries per calendar day for every day of the window, oldest day first.
pub fn activity(entries: &[MemoryEntry], today: NaiveDate, days: u32) -> Vec<(NaiveDate, usize)> {
    let start = window_start(today, days);
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for entry in entries {
        if let Some(date) = entry_date(entry) {
            if date >= start && date <= today {
                *counts.entry(date).or_default() += 1;
            }
        }
    }

    start
        .iter_days()
        .take_while(|d| *d <= today)
        .map(|d| (d, counts.get(&d).copied().unwrap_or(0)))
        .collect()
}
