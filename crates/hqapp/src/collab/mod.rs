//! # External Collaborators
//!
//! HQ talks to two things it does not own: a calendar and a chat bot. Both
//! sit behind small traits so commands can be tested with fakes and so a
//! failing collaborator never takes a read path down with it.
//!
//! - [`CalendarSource`]: events in a time range. The shipped implementation,
//!   [`CachedCalendar`], reads the calendar cache document that an external
//!   sync job keeps fresh. Use [`events_or_empty`] on read paths: any failure
//!   degrades to "no events" with a warning.
//! - [`MessageSink`]: delivers a plain-text message. [`TelegramSink`] posts
//!   to the Telegram Bot API. Send failures are returned to the caller,
//!   which must not record the message as sent.

use crate::error::Result;
use crate::model::calendar::CalendarEvent;
use chrono::{DateTime, Utc};
use tracing::warn;

pub mod calendar;
pub mod message;
pub mod telegram;

pub use calendar::CachedCalendar;
pub use telegram::TelegramSink;

pub trait CalendarSource {
    /// Events starting between `start` and `end`, inclusive.
    fn fetch_events(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<CalendarEvent>>;
}

pub trait MessageSink {
    fn send(&self, chat_id: &str, text: &str) -> Result<()>;
}

/// Fetch events, treating any failure as an empty calendar.
pub fn events_or_empty<C: CalendarSource + ?Sized>(
    source: &C,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<CalendarEvent> {
    match source.fetch_events(start, end) {
        Ok(events) => events,
        Err(e) => {
            warn!(error = %e, "calendar unavailable, continuing without events");
            Vec::new()
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use crate::error::HqError;
    use parking_lot::Mutex;

    pub struct FixedCalendar(pub Vec<CalendarEvent>);

    impl CalendarSource for FixedCalendar {
        fn fetch_events(&self, _: DateTime<Utc>, _: DateTime<Utc>) -> Result<Vec<CalendarEvent>> {
            Ok(self.0.clone())
        }
    }

    pub struct BrokenCalendar;

    impl CalendarSource for BrokenCalendar {
        fn fetch_events(&self, _: DateTime<Utc>, _: DateTime<Utc>) -> Result<Vec<CalendarEvent>> {
            Err(HqError::Collaborator("not connected".into()))
        }
    }

    /// Records every message; fails every send when `fail` is set.
    #[derive(Default)]
    pub struct RecordingSink {
        pub fail: bool,
        pub sent: Mutex<Vec<(String, String)>>,
    }

    impl MessageSink for RecordingSink {
        fn send(&self, chat_id: &str, text: &str) -> Result<()> {
            if self.fail {
                return Err(HqError::Collaborator("bot unreachable".into()));
            }
            self.sent.lock().push((chat_id.to_string(), text.to_string()));
            Ok(())
        }
    }
}
