//! Org-mode active timestamps.

use std::fmt::Display;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use tracing::warn;

use crate::event::Category;

const DATE_FORMAT: &str = "%Y-%m-%d %a";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %a %H:%M";
const TIME_FORMAT: &str = "%H:%M";

/// Format the timestamp line for an event, converting instants into `tz`.
pub fn format_timestamp<Tz>(category: Category, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match category {
        Category::AllDay { start, end } => format_all_day(start, end),
        Category::Appointment { start, end } => format_appointment(start, end, tz),
    }
}

/// Whole-day range. The service's end date is exclusive while org's is
/// inclusive, so the last rendered day is the day before `end_exclusive`.
pub fn format_all_day(start: NaiveDate, end_exclusive: NaiveDate) -> String {
    let end = end_exclusive.pred_opt().unwrap_or(end_exclusive);

    if end < start {
        warn!(%start, %end_exclusive, "All-day event ends before it starts, rendering start date only");
    }

    if end <= start {
        format!("<{}>", start.format(DATE_FORMAT))
    } else {
        format!("<{}>--<{}>", start.format(DATE_FORMAT), end.format(DATE_FORMAT))
    }
}

/// Timed range, collapsed to `<date start-end>` when both ends fall on the
/// same local day.
pub fn format_appointment<Tz>(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    tz: &Tz,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let start = start.with_timezone(tz);
    let end = end.with_timezone(tz);

    if start.date_naive() == end.date_naive() {
        format!("<{}-{}>", start.format(DATE_TIME_FORMAT), end.format(TIME_FORMAT))
    } else {
        format!(
            "<{}>--<{}>",
            start.format(DATE_TIME_FORMAT),
            end.format(DATE_TIME_FORMAT)
        )
    }
}
