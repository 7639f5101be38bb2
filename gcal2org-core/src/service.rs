//! The seam between rendering and whatever talks to the calendar service.

use chrono::{DateTime, Utc};

use crate::error::ServiceError;
use crate::event::Event;

/// Display name and events for one calendar window.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarData {
    pub display_name: String,
    pub events: Vec<Event>,
}

/// Source of calendars and their events.
///
/// Calls are blocking. Errors are handed back to the caller untouched;
/// nothing here retries. Any `std::error::Error` or `anyhow::Error` fits.
pub trait CalendarService {
    type Error: Into<ServiceError>;

    fn calendar_display_name(&self, calendar_id: &str) -> Result<String, Self::Error>;

    /// Events overlapping `[start, end)`, recurrences already expanded,
    /// in the order they should be rendered.
    fn list_events(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>, Self::Error>;

    fn fetch(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<CalendarData, Self::Error> {
        Ok(CalendarData {
            display_name: self.calendar_display_name(calendar_id)?,
            events: self.list_events(calendar_id, start, end)?,
        })
    }
}
