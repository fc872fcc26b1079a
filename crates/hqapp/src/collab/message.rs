//! Plain-text daily agenda message.
//!
//! Sent as plain text: no markup, so nothing needs escaping.

use crate::model::calendar::CalendarEvent;
use crate::model::tasks::Task;
use chrono::{DateTime, NaiveDate};

fn priority_marker(priority: &str) -> &'static str {
    match priority {
        "high" => "[!]",
        "medium" => "[-]",
        _ => "[ ]",
    }
}

/// `HH:MM` for a date-time start or end, or the raw value when unparsable.
fn clock(value: &str) -> String {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|_| value.to_string())
}

fn event_line(event: &CalendarEvent) -> String {
    let mut line = if event.all_day {
        format!("- {} (all day)", event.title)
    } else {
        format!(
            "- {}-{}: {}",
            clock(&event.start),
            clock(&event.end),
            event.title
        )
    };
    if !event.all_day && !event.location.is_empty() {
        line.push_str(&format!(" ({})", event.location));
    }
    line
}

pub fn agenda_message(
    date: NaiveDate,
    tasks: &[Task],
    events: &[CalendarEvent],
    notes: &str,
) -> String {
    let mut lines = vec![
        format!("Daily Agenda - {}", date.format("%A, %B %-d")),
        String::new(),
        "Meetings".to_string(),
    ];

    if events.is_empty() {
        lines.push("No meetings today.".to_string());
    } else {
        lines.extend(events.iter().map(event_line));
    }
    lines.push(String::new());

    lines.push("Tasks".to_string());
    if tasks.is_empty() {
        lines.push("No tasks for today.".to_string());
    } else {
        for task in tasks {
            let done = if task.is_done() { " (done)" } else { "" };
            lines.push(format!(
                "{} {}{}",
                priority_marker(&task.priority),
                task.title,
                done
            ));
        }
    }

    if !notes.trim().is_empty() {
        lines.push(String::new());
        lines.push("Apollo's Notes".to_string());
        lines.push(notes.trim().to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(title: &str, priority: &str, status: &str) -> Task {
        Task {
            id: title.to_string(),
            title: title.to_string(),
            date: "2025-06-02".to_string(),
            priority: priority.to_string(),
            status: status.to_string(),
            category: "deeper-prime".to_string(),
            notes: String::new(),
            created_at: None,
            completed_at: None,
            extra: Default::default(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn empty_day() {
        let text = agenda_message(date(), &[], &[], "");
        assert_eq!(
            text,
            "Daily Agenda - Monday, June 2\n\nMeetings\nNo meetings today.\n\nTasks\nNo tasks for today."
        );
    }

    #[test]
    fn lists_events_tasks_and_notes() {
        let events = vec![
            CalendarEvent {
                title: "Standup".into(),
                start: "2025-06-02T09:00:00Z".into(),
                end: "2025-06-02T09:15:00Z".into(),
                location: "Zoom".into(),
                ..Default::default()
            },
            CalendarEvent {
                title: "Offsite".into(),
                start: "2025-06-02".into(),
                all_day: true,
                ..Default::default()
            },
        ];
        let tasks = vec![task("Ship", "high", "done"), task("Read", "low", "todo")];

        let text = agenda_message(date(), &tasks, &events, "  Focus on launch. ");
        assert!(text.contains("- 09:00-09:15: Standup (Zoom)"));
        assert!(text.contains("- Offsite (all day)"));
        assert!(text.contains("[!] Ship (done)"));
        assert!(text.contains("[ ] Read"));
        assert!(text.ends_with("Apollo's Notes\nFocus on launch."));
    }
}
