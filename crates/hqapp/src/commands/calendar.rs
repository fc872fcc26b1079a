//! Calendar cache commands.
//!
//! The cache is normally filled by an external sync job; [`replace_cache`]
//! is the write side it (or the CLI) uses. Reads go through
//! [`CachedCalendar`](crate::collab::CachedCalendar) or [`events`].

use crate::collab::calendar::events_between;
use crate::error::Result;
use crate::model::calendar::{CalendarCache, CalendarEvent};
use crate::store::DocumentStore;
use chrono::{DateTime, SecondsFormat, Utc};

pub fn cache<S: DocumentStore>(store: &S) -> CalendarCache {
    store.read()
}

/// Cached events starting between the dates of `start` and `end`.
pub fn events<S: DocumentStore>(
    store: &S,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<CalendarEvent> {
    events_between(&store.read::<CalendarCache>().events, start, end)
}

/// Swap in a fresh set of events and stamp `fetchedAt`.
pub fn replace_cache<S: DocumentStore>(
    store: &S,
    events: Vec<CalendarEvent>,
    now: DateTime<Utc>,
) -> Result<CalendarCache> {
    store.update(move |mut cache: CalendarCache| {
        cache.events = events;
        cache.fetched_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        cache
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{make_store, t};

    fn event(id: &str, start: &str) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            start: start.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn never_fetched_cache_is_empty() {
        let store = make_store();
        let cache = cache(&store);
        assert!(cache.events.is_empty());
        assert_eq!(cache.fetched_at, "");
    }

    #[test]
    fn replace_stamps_fetched_at_and_filters_by_day() {
        let store = make_store();
        let cache = replace_cache(
            &store,
            vec![
                event("a", "2025-06-02T10:00:00Z"),
                event("b", "2025-06-04"),
            ],
            t(0),
        )
        .unwrap();
        assert_eq!(cache.fetched_at, "2025-06-02T08:00:00.000Z");

        let ids: Vec<String> = events(&store, t(0), t(0))
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, ["a"]);
        assert_eq!(events(&store, t(0), t(48)).len(), 2);

        let cache = replace_cache(&store, Vec::new(), t(1)).unwrap();
        assert!(cache.events.is_empty());
    }
}
