//! Configuration key grammar.
//!
//! Every key is parsed into a `ConfigKey` before anything is applied, so an
//! unrecognized key fails without touching the configuration being built.

use super::labels::OrgProperty;
use crate::error::ConfigError;

const ORG_PROPERTY_PREFIX: &str = "org-property.";
const CALENDARS_PREFIX: &str = "calendars.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalField {
    Title,
    FileTags,
    Tags,
    AppointmentCategory,
    AllDayCategory,
}

const GLOBAL_FIELDS: &[(&str, GlobalField)] = &[
    ("title", GlobalField::Title),
    ("filetags", GlobalField::FileTags),
    ("tags", GlobalField::Tags),
    ("appointmentcategory", GlobalField::AppointmentCategory),
    ("alldaycategory", GlobalField::AllDayCategory),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarField {
    Id,
    Tags,
    Start,
    End,
}

const CALENDAR_FIELDS: &[(&str, CalendarField)] = &[
    ("id", CalendarField::Id),
    ("tags", CalendarField::Tags),
    ("start", CalendarField::Start),
    ("end", CalendarField::End),
];

impl CalendarField {
    pub fn name(self) -> &'static str {
        match self {
            CalendarField::Id => "id",
            CalendarField::Tags => "tags",
            CalendarField::Start => "start",
            CalendarField::End => "end",
        }
    }
}

/// A recognized configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey<'a> {
    Global(GlobalField),
    OrgProperty(OrgProperty),
    Calendar { alias: &'a str, field: CalendarField },
}

impl<'a> ConfigKey<'a> {
    /// Parse a lower-cased key.
    pub fn parse(key: &'a str) -> Result<Self, ConfigError> {
        if let Some((_, field)) = GLOBAL_FIELDS.iter().find(|(name, _)| *name == key) {
            return Ok(ConfigKey::Global(*field));
        }

        if let Some(name) = key.strip_prefix(ORG_PROPERTY_PREFIX) {
            return OrgProperty::from_config_name(name)
                .map(ConfigKey::OrgProperty)
                .ok_or_else(|| ConfigError::UnknownOrgProperty {
                    name: name.to_string(),
                });
        }

        if let Some(rest) = key.strip_prefix(CALENDARS_PREFIX) {
            let (alias, field_name) = rest
                .split_once('.')
                .ok_or_else(|| ConfigError::MalformedCalendarKey {
                    rest: rest.to_string(),
                })?;

            let field = CALENDAR_FIELDS
                .iter()
                .find(|(name, _)| *name == field_name)
                .map(|(_, field)| *field)
                .ok_or_else(|| ConfigError::UnknownCalendarField {
                    alias: alias.to_string(),
                    field: field_name.to_string(),
                })?;

            return Ok(ConfigKey::Calendar { alias, field });
        }

        Err(ConfigError::UnknownKey {
            key: key.to_string(),
        })
    }
}
