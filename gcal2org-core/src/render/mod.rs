//! Org-mode document rendering.
//!
//! Output layout:
//!
//! ```text
//! #+TITLE: ...                  (optional header lines)
//! #+COMMENT: Generated on ...
//!
//! * <calendar name> <tags>
//! ** <event summary>
//! <timestamp>
//! :PROPERTIES:
//! ...
//! :END:
//! <description>
//! ```

mod timestamp;

use std::fmt::Display;
use std::io::Write;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use tracing::{debug, info};

pub use timestamp::{format_all_day, format_appointment, format_timestamp};

use crate::config::{CalendarSubscription, OrgProperty, ResolvedConfiguration};
use crate::constants::GENERATOR_NAME;
use crate::error::{DataError, Gcal2OrgError, Gcal2OrgResult};
use crate::event::{Category, Event};
use crate::service::CalendarService;

/// Medium date-time with a 12-hour clock, e.g. `Jan 1, 2016 9:00:00 AM`.
const GENERATED_AT_FORMAT: &str = "%b %-d, %Y %-I:%M:%S %p";

/// Renders a resolved configuration into an org document.
///
/// Instants are shown in `tz`; whole-day dates are shown as-is.
pub struct OrgRenderer<'a, Tz: TimeZone> {
    config: &'a ResolvedConfiguration,
    tz: Tz,
    generated_at: DateTime<Tz>,
}

impl<'a, Tz> OrgRenderer<'a, Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn new(config: &'a ResolvedConfiguration, tz: Tz) -> Self {
        let generated_at = Utc::now().with_timezone(&tz);
        OrgRenderer {
            config,
            tz,
            generated_at,
        }
    }

    /// Override the time stamped into the provenance comment.
    pub fn with_generated_at(mut self, generated_at: DateTime<Tz>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Write the whole document, fetching calendars one at a time in
    /// configuration order.
    pub fn render<S, W>(&self, service: &S, out: &mut W) -> Gcal2OrgResult<()>
    where
        S: CalendarService,
        W: Write,
    {
        self.write_header(out)?;

        let mut event_count = 0;
        for subscription in &self.config.calendars {
            event_count += self.write_calendar(service, subscription, out)?;
        }

        out.flush()?;
        info!(
            calendars = self.config.calendars.len(),
            events = event_count,
            "Rendered org document"
        );
        Ok(())
    }

    pub fn render_to_string<S: CalendarService>(&self, service: &S) -> Gcal2OrgResult<String> {
        let mut buf = Vec::new();
        self.render(service, &mut buf)?;
        // Everything written is built from `str`s
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn write_header<W: Write>(&self, out: &mut W) -> Gcal2OrgResult<()> {
        if let Some(title) = &self.config.title {
            writeln!(out, "#+TITLE: {}", title)?;
        }
        if let Some(file_tags) = &self.config.file_tags {
            writeln!(out, "#+FILETAGS: {}", file_tags)?;
        }
        if let Some(tags) = &self.config.tags {
            writeln!(out, "#+TAGS: {}", tags)?;
        }
        writeln!(
            out,
            "#+COMMENT: Generated on {} by {}. Do not edit manually.",
            self.generated_at.format(GENERATED_AT_FORMAT),
            GENERATOR_NAME
        )?;
        writeln!(out)?;
        Ok(())
    }

    fn write_calendar<S, W>(
        &self,
        service: &S,
        subscription: &CalendarSubscription,
        out: &mut W,
    ) -> Gcal2OrgResult<usize>
    where
        S: CalendarService,
        W: Write,
    {
        debug!(
            alias = %subscription.alias,
            id = %subscription.id,
            start = %subscription.start,
            end = %subscription.end,
            "Fetching calendar"
        );

        let data = service
            .fetch(&subscription.id, subscription.start, subscription.end)
            .map_err(|e| Gcal2OrgError::Service(e.into()))?;

        match &subscription.tags {
            Some(tags) => writeln!(out, "* {} {}", data.display_name, tags)?,
            None => writeln!(out, "* {}", data.display_name)?,
        }

        for event in &data.events {
            // Built in full before writing so a bad event leaves no fragment
            let rendered = self.format_event(event)?;
            out.write_all(rendered.as_bytes())?;
        }

        debug!(alias = %subscription.alias, events = data.events.len(), "Rendered calendar");
        Ok(data.events.len())
    }

    fn format_event(&self, event: &Event) -> Result<String, DataError> {
        let category = event.category()?;
        let labels = &self.config.property_labels;

        let category_label = match category {
            Category::AllDay { .. } => &self.config.all_day_category,
            Category::Appointment { .. } => &self.config.appointment_category,
        };

        let properties = [
            ("CATEGORY", category_label.clone()),
            (
                labels.get(OrgProperty::Status),
                event.status.clone().unwrap_or_default(),
            ),
            (
                labels.get(OrgProperty::HangoutLink),
                format_link(event.hangout_link.as_deref(), "hangout"),
            ),
            (
                labels.get(OrgProperty::HtmlLink),
                format_link(event.html_link.as_deref(), "event"),
            ),
            (labels.get(OrgProperty::Creator), event.creator.to_string()),
            (
                labels.get(OrgProperty::CreationTime),
                event
                    .created
                    .map(|created| created.to_rfc3339_opts(SecondsFormat::Millis, true))
                    .unwrap_or_default(),
            ),
            (labels.get(OrgProperty::Attendees), format_attendees(event)),
        ];

        let mut lines = vec![
            format!("** {}", event.summary()),
            format_timestamp(category, &self.tz),
            ":PROPERTIES:".to_string(),
        ];
        lines.extend(properties.iter().map(|(label, value)| format_property(label, value)));
        lines.push(":END:".to_string());

        if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(description.trim_end_matches(['\n', '\r']).to_string());
        }

        let mut rendered = lines.join("\n");
        rendered.push('\n');
        Ok(rendered)
    }
}

fn format_property(label: &str, value: &str) -> String {
    if value.is_empty() {
        format!(":{}:", label)
    } else {
        format!(":{}: {}", label, value)
    }
}

/// Org link. An absent URL still renders the link, with an empty target.
fn format_link(url: Option<&str>, description: &str) -> String {
    format!("[[{}][{}]]", url.unwrap_or_default(), description)
}

fn format_attendees(event: &Event) -> String {
    event
        .attendees
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::CalendarData;
    use chrono_tz::Europe::Paris;
    use chrono_tz::Tz;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::io;
    use std::sync::Mutex;

    /// In-memory service keyed by calendar id; records every window asked for.
    #[derive(Default)]
    struct StaticService {
        calendars: HashMap<String, CalendarData>,
        requests: Mutex<Vec<(String, DateTime<Utc>, DateTime<Utc>)>>,
    }

    impl StaticService {
        fn with_calendar(mut self, id: &str, name: &str, events: Vec<Value>) -> Self {
            let events = events
                .into_iter()
                .map(|e| serde_json::from_value(e).unwrap())
                .collect();
            self.calendars.insert(
                id.to_string(),
                CalendarData {
                    display_name: name.to_string(),
                    events,
                },
            );
            self
        }
    }

    impl CalendarService for StaticService {
        type Error = io::Error;

        fn calendar_display_name(&self, calendar_id: &str) -> Result<String, io::Error> {
            self.calendars
                .get(calendar_id)
                .map(|c| c.display_name.clone())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, calendar_id.to_string()))
        }

        fn list_events(
            &self,
            calendar_id: &str,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<Event>, io::Error> {
            self.requests
                .lock()
                .unwrap()
                .push((calendar_id.to_string(), start, end));
            self.calendars
                .get(calendar_id)
                .map(|c| c.events.clone())
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, calendar_id.to_string()))
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 1, 1, 8, 0, 0).unwrap()
    }

    fn config(entries: &[(&str, &str)]) -> ResolvedConfiguration {
        ResolvedConfiguration::resolve_at(entries.iter().copied(), now()).unwrap()
    }

    fn render(config: &ResolvedConfiguration, service: &StaticService) -> Gcal2OrgResult<String> {
        OrgRenderer::new(config, Paris)
            .with_generated_at(now().with_timezone(&Paris))
            .render_to_string(service)
    }

    fn standup() -> Value {
        json!({
            "summary": "Standup",
            "description": "Daily sync",
            "status": "confirmed",
            "htmlLink": "https://calendar.example.com/e/1",
            "hangoutLink": "https://meet.example.com/abc",
            "created": "2015-12-20T10:00:00Z",
            "creator": { "displayName": "Alice", "email": "alice@example.com" },
            "attendees": [
                { "displayName": "A", "email": "a@x" },
                { "displayName": "B", "email": "b@x" }
            ],
            "start": { "dateTime": "2016-01-01T09:00:00+01:00" },
            "end": { "dateTime": "2016-01-01T10:30:00+01:00" }
        })
    }

    fn holiday() -> Value {
        json!({
            "summary": "Holiday",
            "status": "confirmed",
            "creator": { "email": "bob@example.com" },
            "start": { "date": "2016-01-01" },
            "end": { "date": "2016-01-04" }
        })
    }

    #[test]
    fn test_full_document() {
        let config = config(&[
            ("title", "Agenda"),
            ("filetags", ":gcal:"),
            ("calendars.work.id", "work@example.com"),
            ("calendars.work.tags", ":work:"),
        ]);
        let service = StaticService::default().with_calendar(
            "work@example.com",
            "Work",
            vec![standup(), holiday()],
        );

        let output = render(&config, &service).unwrap();

        let expected = "\
#+TITLE: Agenda
#+FILETAGS: :gcal:
#+COMMENT: Generated on Jan 1, 2016 9:00:00 AM by gcal-to-org. Do not edit manually.

* Work :work:
** Standup
<2016-01-01 Fri 09:00-10:30>
:PROPERTIES:
:CATEGORY: Appt
:status: confirmed
:hangout-link: [[https://meet.example.com/abc][hangout]]
:html-link: [[https://calendar.example.com/e/1][event]]
:creator: Alice <alice@example.com>
:created-at: 2015-12-20T10:00:00.000Z
:attendees: A <a@x>, B <b@x>
:END:
Daily sync
** Holiday
<2016-01-01 Fri>--<2016-01-03 Sun>
:PROPERTIES:
:CATEGORY: Event
:status: confirmed
:hangout-link: [[][hangout]]
:html-link: [[][event]]
:creator: <bob@example.com>
:created-at:
:attendees:
:END:
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_header_without_optional_lines() {
        let config = config(&[]);
        let output = render(&config, &StaticService::default()).unwrap();

        assert_eq!(
            output,
            "#+COMMENT: Generated on Jan 1, 2016 9:00:00 AM by gcal-to-org. Do not edit manually.\n\n"
        );
    }

    #[test]
    fn test_custom_labels_and_categories() {
        let config = config(&[
            ("appointmentcategory", "Meeting"),
            ("org-property.status", "STATE"),
            ("org-property.attendees", "WHO"),
            ("calendars.work.id", "w"),
        ]);
        let service = StaticService::default().with_calendar("w", "Work", vec![standup()]);

        let output = render(&config, &service).unwrap();

        assert!(output.contains("* Work\n"), "no tags means a bare heading");
        assert!(output.contains(":CATEGORY: Meeting\n"));
        assert!(output.contains(":STATE: confirmed\n"));
        assert!(output.contains(":WHO: A <a@x>, B <b@x>\n"));
        assert!(!output.contains(":status:"));
    }

    #[test]
    fn test_empty_description_is_omitted() {
        let config = config(&[("calendars.work.id", "w")]);
        let mut event = holiday();
        event["description"] = json!("");
        let service = StaticService::default().with_calendar("w", "Work", vec![event]);

        let output = render(&config, &service).unwrap();

        assert!(output.ends_with(":END:\n"));
    }

    #[test]
    fn test_calendars_render_in_configuration_order_with_their_windows() {
        let config = config(&[
            ("calendars.b.id", "b-id"),
            ("calendars.a.id", "a-id"),
            ("calendars.a.start", "-1"),
            ("calendars.a.end", "1"),
        ]);
        let service = StaticService::default()
            .with_calendar("a-id", "First", vec![])
            .with_calendar("b-id", "Second", vec![]);

        let output = render(&config, &service).unwrap();

        let first = output.find("* First").unwrap();
        let second = output.find("* Second").unwrap();
        assert!(first < second);

        let requests = service.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].0, "a-id");
        assert_eq!(requests[0].1, now() - chrono::TimeDelta::days(1));
        assert_eq!(requests[0].2, now() + chrono::TimeDelta::days(1));
        assert_eq!(requests[1].0, "b-id");
    }

    #[test]
    fn test_mixed_bounds_fail_without_partial_event() {
        let config = config(&[("calendars.work.id", "w")]);
        let odd = json!({
            "summary": "Odd one",
            "start": { "date": "2016-01-01" },
            "end": { "dateTime": "2016-01-01T10:00:00Z" }
        });
        let service = StaticService::default().with_calendar("w", "Work", vec![standup(), odd]);

        let mut out = Vec::new();
        let result = OrgRenderer::new(&config, Paris).render(&service, &mut out);

        match result {
            Err(Gcal2OrgError::Data(DataError::MixedBounds { summary })) => {
                assert_eq!(summary, "Odd one")
            }
            other => panic!("expected a data error, got {:?}", other),
        }
        let written = String::from_utf8(out).unwrap();
        assert!(written.contains("** Standup"));
        assert!(!written.contains("Odd one"));
    }

    #[test]
    fn test_service_errors_propagate() {
        let config = config(&[("calendars.work.id", "missing")]);

        let err = render(&config, &StaticService::default()).unwrap_err();

        let Gcal2OrgError::Service(source) = err else {
            panic!("expected a service error");
        };
        let io_err = source.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_renders_in_requested_zone() {
        let config = config(&[("calendars.work.id", "w")]);
        let service = StaticService::default().with_calendar("w", "Work", vec![standup()]);
        let tokyo: Tz = "Asia/Tokyo".parse().unwrap();

        let output = OrgRenderer::new(&config, tokyo)
            .render_to_string(&service)
            .unwrap();

        assert!(output.contains("<2016-01-01 Fri 17:00-18:30>"));
    }
}
