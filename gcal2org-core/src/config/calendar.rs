//! Per-calendar subscription configuration.

use chrono::{DateTime, TimeDelta, Utc};

use super::key::CalendarField;
use crate::constants::{DEFAULT_END_OFFSET_DAYS, DEFAULT_START_OFFSET_DAYS};
use crate::error::ConfigError;

/// One configured calendar to query and render.
///
/// `start` and `end` are absolute; they were computed from day offsets
/// against the `now` shared by the whole configuration load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarSubscription {
    pub alias: String,
    pub id: String,
    pub tags: Option<String>,
    pub start_offset_days: i64,
    pub end_offset_days: i64,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Accumulates `calendars.<alias>.*` entries until the load is finished.
#[derive(Debug, Clone)]
pub(crate) struct CalendarBuilder {
    alias: String,
    id: Option<String>,
    tags: Option<String>,
    start_offset_days: i64,
    end_offset_days: i64,
}

impl CalendarBuilder {
    pub(crate) fn new(alias: &str) -> Self {
        CalendarBuilder {
            alias: alias.to_string(),
            id: None,
            tags: None,
            start_offset_days: DEFAULT_START_OFFSET_DAYS,
            end_offset_days: DEFAULT_END_OFFSET_DAYS,
        }
    }

    pub(crate) fn set(&mut self, field: CalendarField, value: &str) -> Result<(), ConfigError> {
        match field {
            CalendarField::Id => self.id = Some(value.to_string()),
            CalendarField::Tags => self.tags = Some(value.to_string()),
            CalendarField::Start => self.start_offset_days = self.parse_offset(field, value)?,
            CalendarField::End => self.end_offset_days = self.parse_offset(field, value)?,
        }
        Ok(())
    }

    fn parse_offset(&self, field: CalendarField, value: &str) -> Result<i64, ConfigError> {
        value
            .trim()
            .parse::<i64>()
            .map_err(|_| self.invalid_offset(field, value))
    }

    fn invalid_offset(&self, field: CalendarField, value: &str) -> ConfigError {
        ConfigError::InvalidOffset {
            alias: self.alias.clone(),
            field: field.name().to_string(),
            value: value.to_string(),
        }
    }

    fn days_from(
        &self,
        now: DateTime<Utc>,
        field: CalendarField,
        days: i64,
    ) -> Result<DateTime<Utc>, ConfigError> {
        TimeDelta::try_days(days)
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or_else(|| self.invalid_offset(field, &days.to_string()))
    }

    pub(crate) fn build(self, now: DateTime<Utc>) -> Result<CalendarSubscription, ConfigError> {
        let start = self.days_from(now, CalendarField::Start, self.start_offset_days)?;
        let end = self.days_from(now, CalendarField::End, self.end_offset_days)?;

        if start > end {
            return Err(ConfigError::StartAfterEnd {
                alias: self.alias,
                start,
                end,
            });
        }

        let Some(id) = self.id else {
            return Err(ConfigError::MissingId { alias: self.alias });
        };

        Ok(CalendarSubscription {
            alias: self.alias,
            id,
            tags: self.tags,
            start_offset_days: self.start_offset_days,
            end_offset_days: self.end_offset_days,
            start,
            end,
        })
    }
}
