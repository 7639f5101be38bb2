//! Configuration resolution.
//!
//! A properties file is a flat list of key/value pairs. `resolve` turns
//! them into a `ResolvedConfiguration`, rejecting any key it does not
//! recognize so typos surface immediately.

mod calendar;
mod key;
mod labels;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

pub use calendar::CalendarSubscription;
pub use key::{CalendarField, ConfigKey, GlobalField};
pub use labels::{OrgProperty, PropertyLabels};

use crate::constants::{DEFAULT_ALL_DAY_CATEGORY, DEFAULT_APPOINTMENT_CATEGORY};
use crate::error::ConfigError;
use calendar::CalendarBuilder;

/// Fully resolved, immutable configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfiguration {
    pub title: Option<String>,
    pub file_tags: Option<String>,
    pub tags: Option<String>,
    pub appointment_category: String,
    pub all_day_category: String,
    pub property_labels: PropertyLabels,
    /// Ordered by alias.
    pub calendars: Vec<CalendarSubscription>,
}

impl ResolvedConfiguration {
    /// Resolve entries against the current time.
    pub fn resolve<I, K, V>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::resolve_at(entries, Utc::now())
    }

    /// Resolve entries, computing every calendar window from the same `now`.
    pub fn resolve_at<I, K, V>(entries: I, now: DateTime<Utc>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut resolver = ConfigResolver::default();
        for (key, value) in entries {
            resolver.apply(key.as_ref(), value.as_ref())?;
        }
        resolver.finish(now)
    }
}

/// In-progress configuration, filled in one entry at a time.
#[derive(Debug)]
struct ConfigResolver {
    title: Option<String>,
    file_tags: Option<String>,
    tags: Option<String>,
    appointment_category: String,
    all_day_category: String,
    property_labels: PropertyLabels,
    calendars: BTreeMap<String, CalendarBuilder>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        ConfigResolver {
            title: None,
            file_tags: None,
            tags: None,
            appointment_category: DEFAULT_APPOINTMENT_CATEGORY.to_string(),
            all_day_category: DEFAULT_ALL_DAY_CATEGORY.to_string(),
            property_labels: PropertyLabels::default(),
            calendars: BTreeMap::new(),
        }
    }
}

impl ConfigResolver {
    fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let key = key.to_lowercase();

        match ConfigKey::parse(&key)? {
            ConfigKey::Global(field) => self.set_global(field, value),
            ConfigKey::OrgProperty(property) => self.property_labels.set(property, value),
            ConfigKey::Calendar { alias, field } => {
                self.calendars
                    .entry(alias.to_string())
                    .or_insert_with(|| CalendarBuilder::new(alias))
                    .set(field, value)?;
            }
        }

        Ok(())
    }

    fn set_global(&mut self, field: GlobalField, value: &str) {
        let value = value.to_string();
        match field {
            GlobalField::Title => self.title = Some(value),
            GlobalField::FileTags => self.file_tags = Some(value),
            GlobalField::Tags => self.tags = Some(value),
            GlobalField::AppointmentCategory => self.appointment_category = value,
            GlobalField::AllDayCategory => self.all_day_category = value,
        }
    }

    fn finish(self, now: DateTime<Utc>) -> Result<ResolvedConfiguration, ConfigError> {
        let calendars = self
            .calendars
            .into_values()
            .map(|builder| builder.build(now))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(calendars = calendars.len(), %now, "Resolved configuration");

        Ok(ResolvedConfiguration {
            title: self.title,
            file_tags: self.file_tags,
            tags: self.tags,
            appointment_category: self.appointment_category,
            all_day_category: self.all_day_category,
            property_labels: self.property_labels,
            calendars,
        })
    }
}
