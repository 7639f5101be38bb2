//! Core types for gcal2org.
//!
//! This crate holds everything between the properties file and the rendered
//! org document:
//! - `config` resolves flat key/value entries into a typed configuration
//! - `event` is the calendar event model (deserializable from Google JSON)
//! - `service` is the seam to whatever fetches calendars and events
//! - `render` writes the org-mode document

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod properties;
pub mod render;
pub mod service;

pub use config::{CalendarSubscription, OrgProperty, PropertyLabels, ResolvedConfiguration};
pub use error::{ConfigError, DataError, Gcal2OrgError, Gcal2OrgResult, ServiceError};
pub use event::{Category, Event, EventBound, Person};
pub use render::OrgRenderer;
pub use service::{CalendarData, CalendarService};
