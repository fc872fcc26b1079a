use super::CalendarSource;
use crate::error::Result;
use crate::model::calendar::{CalendarCache, CalendarEvent};
use crate::model::date_of;
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// A calendar backed by `calendar-cache.json`.
///
/// Events are matched on the calendar day they start, so a range covers
/// whole days: an event starting at 23:30 on the end date is included.
pub struct CachedCalendar<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> CachedCalendar<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

/// Events whose start date falls between the dates of `start` and `end`.
pub fn events_between(
    events: &[CalendarEvent],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<CalendarEvent> {
    let (from, to) = (date_of(start), date_of(end));
    events
        .iter()
        .filter(|e| {
            let day = e.start_date();
            !day.is_empty() && day >= from.as_str() && day <= to.as_str()
        })
        .cloned()
        .collect()
}

impl<S: DocumentStore> CalendarSource for CachedCalendar<S> {
    fn fetch_events(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<CalendarEvent>> {
        let cache: CalendarCache = self.store.read();
        Ok(events_between(&cache.events, start, end))
    }
}
