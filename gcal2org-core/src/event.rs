//! Calendar event types.
//!
//! Field names follow the Google Calendar v3 event resource so events can be
//! deserialized straight from API responses. Recurring events are expected
//! to arrive already expanded into single occurrences.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;

use crate::error::DataError;

/// A calendar event (read-only to this crate).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub hangout_link: Option<String>,
    pub html_link: Option<String>,
    #[serde(default)]
    pub creator: Person,
    pub created: Option<DateTime<Utc>>,
    /// Absent in the payload means no attendees.
    #[serde(default)]
    pub attendees: Vec<Person>,
    pub start: EventBound,
    pub end: EventBound,
}

/// An event creator or attendee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.display_name, &self.email) {
            (Some(name), Some(email)) => write!(f, "{} <{}>", name, email),
            (None, Some(email)) => write!(f, "<{}>", email),
            (Some(name), None) => write!(f, "{}", name),
            (None, None) => Ok(()),
        }
    }
}

/// Start or end of an event.
///
/// Whole-day bounds carry a calendar date with no time zone; timed bounds
/// are absolute instants carrying the offset they were reported with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "WireEventBound")]
pub enum EventBound {
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

/// `{"date": ...}` or `{"dateTime": ..., "timeZone": ...}` as sent by Google.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEventBound {
    date: Option<NaiveDate>,
    date_time: Option<DateTime<FixedOffset>>,
}

impl TryFrom<WireEventBound> for EventBound {
    type Error = String;

    fn try_from(wire: WireEventBound) -> Result<Self, Self::Error> {
        match (wire.date, wire.date_time) {
            (Some(date), None) => Ok(EventBound::Date(date)),
            (None, Some(date_time)) => Ok(EventBound::DateTime(date_time)),
            (Some(_), Some(_)) => Err("event bound has both 'date' and 'dateTime'".into()),
            (None, None) => Err("event bound has neither 'date' nor 'dateTime'".into()),
        }
    }
}

/// How an event is rendered, decided by its two bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Whole-day event. `end` is exclusive, as reported by the service.
    AllDay { start: NaiveDate, end: NaiveDate },
    Appointment {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
}

impl Event {
    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or_default()
    }

    /// Classify the event. Bounds of different kinds are rejected.
    pub fn category(&self) -> Result<Category, DataError> {
        match (self.start, self.end) {
            (EventBound::Date(start), EventBound::Date(end)) => Ok(Category::AllDay { start, end }),
            (EventBound::DateTime(start), EventBound::DateTime(end)) => {
                Ok(Category::Appointment { start, end })
            }
            _ => Err(DataError::MixedBounds {
                summary: self.summary().to_string(),
            }),
        }
    }
}
