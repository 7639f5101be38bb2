//! Offline calendar source backed by saved API responses.
//!
//! Each calendar is a `<calendar-id>.json` file shaped like a Google
//! `events.list` response: `summary` is the calendar name, `items` its
//! events. Handy for rendering exports or for testing a configuration
//! without network access.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveTime, Utc};
use gcal2org_core::{CalendarData, CalendarService, Category, Event};
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct CalendarFile {
    summary: String,
    #[serde(default)]
    items: Vec<Event>,
}

pub struct LocalDir {
    dir: PathBuf,
}

impl LocalDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocalDir { dir: dir.into() }
    }

    fn calendar_path(&self, calendar_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", calendar_id))
    }

    fn load(&self, calendar_id: &str) -> Result<CalendarFile> {
        let path = self.calendar_path(calendar_id);
        read_calendar_file(&path)
            .with_context(|| format!("Failed to load calendar {} from {}", calendar_id, path.display()))
    }
}

fn read_calendar_file(path: &Path) -> Result<CalendarFile> {
    let contents = std::fs::read_to_string(path)?;
    let file = serde_json::from_str(&contents)?;
    Ok(file)
}

/// Keeps the events overlapping `[start, end)`, in file order. All-day
/// bounds are read as UTC midnights.
fn events_in_window(
    calendar_id: &str,
    items: Vec<Event>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Event> {
    let total = items.len();
    let events: Vec<Event> = items
        .into_iter()
        .filter(|event| overlaps(event, start, end))
        .collect();
    debug!(calendar_id, %start, %end, total, kept = events.len(), "Loaded saved events");
    events
}

/// Events with mixed bounds are kept so rendering can report them.
fn overlaps(event: &Event, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    let (event_start, event_end) = match event.category() {
        Ok(Category::AllDay { start: first, end: last }) => (
            first.and_time(NaiveTime::MIN).and_utc(),
            last.and_time(NaiveTime::MIN).and_utc(),
        ),
        Ok(Category::Appointment { start: first, end: last }) => {
            (first.with_timezone(&Utc), last.with_timezone(&Utc))
        }
        Err(_) => return true,
    };

    if event_end <= event_start {
        return start <= event_start && event_start < end;
    }
    event_start < end && event_end > start
}

impl CalendarService for LocalDir {
    type Error = anyhow::Error;

    fn calendar_display_name(&self, calendar_id: &str) -> Result<String> {
        Ok(self.load(calendar_id)?.summary)
    }

    fn list_events(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        let file = self.load(calendar_id)?;
        Ok(events_in_window(calendar_id, file.items, start, end))
    }

    fn fetch(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<CalendarData> {
        let CalendarFile { summary, items } = self.load(calendar_id)?;
        Ok(CalendarData {
            display_name: summary,
            events: events_in_window(calendar_id, items, start, end),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2016, 2, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_reads_calendar_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("work@example.com.json"),
            r#"{
                "kind": "calendar#events",
                "summary": "Work",
                "items": [
                    {"summary": "Kickoff", "start": {"date": "2016-01-04"}, "end": {"date": "2016-01-05"}}
                ]
            }"#,
        )
        .unwrap();

        let local = LocalDir::new(dir.path());
        let (start, end) = window();
        let data = local.fetch("work@example.com", start, end).unwrap();

        assert_eq!(data.display_name, "Work");
        assert_eq!(data.events.len(), 1);
        assert_eq!(data.events[0].summary(), "Kickoff");
    }

    #[test]
    fn test_events_outside_window_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("home.json"),
            r#"{
                "summary": "Home",
                "items": [
                    {"summary": "Old", "start": {"date": "2010-01-01"}, "end": {"date": "2010-01-02"}},
                    {"summary": "New Year", "start": {"date": "2015-12-31"}, "end": {"date": "2016-01-02"}},
                    {"summary": "Dinner", "start": {"dateTime": "2016-01-10T19:00:00+01:00"}, "end": {"dateTime": "2016-01-10T21:00:00+01:00"}},
                    {"summary": "Ends at window start", "start": {"date": "2015-12-30"}, "end": {"date": "2016-01-01"}},
                    {"summary": "Starts at window end", "start": {"dateTime": "2016-02-01T00:00:00Z"}, "end": {"dateTime": "2016-02-01T01:00:00Z"}}
                ]
            }"#,
        )
        .unwrap();

        let (start, end) = window();
        let data = LocalDir::new(dir.path()).fetch("home", start, end).unwrap();

        let summaries: Vec<&str> = data.events.iter().map(|e| e.summary()).collect();
        assert_eq!(data.display_name, "Home");
        assert_eq!(summaries, vec!["New Year", "Dinner"]);
    }

    #[test]
    fn test_mixed_bounds_are_left_for_rendering() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("odd.json"),
            r#"{
                "summary": "Odd",
                "items": [
                    {"summary": "Broken", "start": {"date": "2016-01-04"}, "end": {"dateTime": "2016-01-04T10:00:00Z"}}
                ]
            }"#,
        )
        .unwrap();

        let (start, end) = window();
        let events = LocalDir::new(dir.path()).list_events("odd", start, end).unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].category().is_err());
    }

    #[test]
    fn test_missing_items_means_no_events() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("empty.json"), r#"{"summary": "Empty"}"#).unwrap();

        let (start, end) = window();
        let events = LocalDir::new(dir.path())
            .list_events("empty", start, end)
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_missing_file_names_calendar() {
        let dir = tempfile::tempdir().unwrap();

        let err = LocalDir::new(dir.path())
            .calendar_display_name("nope")
            .unwrap_err();
        assert!(err.to_string().contains("nope"), "{}", err);
    }
}
