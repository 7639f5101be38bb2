//! Error types for gcal2org.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Boxed error coming back from a `CalendarService` implementation.
pub type ServiceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while resolving configuration or rendering.
#[derive(Error, Debug)]
pub enum Gcal2OrgError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Event data error: {0}")]
    Data(#[from] DataError),

    #[error("Calendar service error: {0}")]
    Service(#[source] ServiceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A malformed or unrecognized configuration entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown option {key}.")]
    UnknownKey { key: String },

    #[error("Unknown option org-property.{name}.")]
    UnknownOrgProperty { name: String },

    #[error("Unknown option calendars.{rest}. Expected calendars.<alias>.<field>.")]
    MalformedCalendarKey { rest: String },

    #[error("Unknown option {field} for calendar {alias}.")]
    UnknownCalendarField { alias: String, field: String },

    #[error("Invalid day offset '{value}' for {field} of calendar {alias}.")]
    InvalidOffset {
        alias: String,
        field: String,
        value: String,
    },

    #[error("Calendar {alias} is missing required 'id' parameter.")]
    MissingId { alias: String },

    #[error("Start date ({start}) cannot be later than end date ({end}) for calendar {alias}.")]
    StartAfterEnd {
        alias: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Event data this crate refuses to render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("Event '{summary}' has both date and date-time bounds. Not currently supported.")]
    MixedBounds { summary: String },
}

/// Result type alias for gcal2org operations.
pub type Gcal2OrgResult<T> = Result<T, Gcal2OrgError>;
