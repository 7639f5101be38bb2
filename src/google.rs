//! Google Calendar API v3 adapter.
//!
//! Uses a bearer token obtained elsewhere (e.g. `gcloud auth
//! print-access-token`); this module never refreshes or stores tokens.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use gcal2org_core::{CalendarService, Event};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

const API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3/";

/// `calendars.get` response (only the fields we read).
#[derive(Deserialize)]
struct CalendarResource {
    summary: String,
}

/// One page of an `events.list` response.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsPage {
    #[serde(default)]
    items: Vec<Event>,
    next_page_token: Option<String>,
}

pub struct GoogleCalendar {
    client: reqwest::blocking::Client,
    access_token: String,
    base_url: Url,
}

impl GoogleCalendar {
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let base_url = Url::parse(API_BASE_URL).context("Invalid Google Calendar API URL")?;
        Self::with_base_url(access_token, base_url)
    }

    pub fn with_base_url(access_token: impl Into<String>, base_url: Url) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(GoogleCalendar {
            client,
            access_token: access_token.into(),
            base_url,
        })
    }

    /// `<base>/calendars/<id>/<tail...>` with the id percent-encoded as a
    /// single path segment.
    fn calendar_url(&self, calendar_id: &str, tail: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Base URL {} cannot have path segments", self.base_url))?
            .pop_if_empty()
            .push("calendars")
            .push(calendar_id)
            .extend(tail);
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            anyhow::bail!("Google Calendar API returned {} for {}: {}", status, url, body);
        }

        response
            .json()
            .with_context(|| format!("Failed to parse response from {}", url))
    }
}

impl CalendarService for GoogleCalendar {
    type Error = anyhow::Error;

    fn calendar_display_name(&self, calendar_id: &str) -> Result<String> {
        let url = self.calendar_url(calendar_id, &[])?;
        let calendar: CalendarResource = self
            .get_json(url, &[])
            .with_context(|| format!("Failed to get calendar {}", calendar_id))?;
        Ok(calendar.summary)
    }

    fn list_events(
        &self,
        calendar_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        let url = self.calendar_url(calendar_id, &["events"])?;
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("timeMin", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("timeMax", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ];
            if let Some(token) = page_token.take() {
                query.push(("pageToken", token));
            }

            let page: EventsPage = self
                .get_json(url.clone(), &query)
                .with_context(|| format!("Failed to list events for calendar {}", calendar_id))?;

            debug!(calendar_id, count = page.items.len(), "Fetched events page");
            events.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(events)
    }
}
