/// Default window start for a calendar, in days relative to now.
pub const DEFAULT_START_OFFSET_DAYS: i64 = -10;

/// Default window end for a calendar, in days relative to now.
pub const DEFAULT_END_OFFSET_DAYS: i64 = 30;

pub const DEFAULT_APPOINTMENT_CATEGORY: &str = "Appt";
pub const DEFAULT_ALL_DAY_CATEGORY: &str = "Event";

/// Name written into the provenance comment of every generated document.
pub const GENERATOR_NAME: &str = "gcal-to-org";
