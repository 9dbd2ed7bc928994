//! Google Calendar v3 API client for listing, inserting, deleting,
//! and patching events on a single calendar
//!
//! This is a thin typed wrapper over the REST API. Error
//! classification happens in `calendar::backend`, which knows which
//! configured account a request was for.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Event start/end from the Calendar API. Timed events carry
/// `dateTime`, all-day events carry a bare `date`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EventTime {
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GcalEvent {
    pub id: String,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
}

#[derive(Debug, Deserialize)]
pub struct ListEventsResponse {
    pub items: Option<Vec<GcalEvent>>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// Fields accepted when inserting a new event.
#[derive(Debug, Serialize)]
pub struct EventWrite {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
}

#[derive(Clone, Debug)]
pub struct GcalClient {
    base_url: String,
}

impl GcalClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        )
    }

    /// List events overlapping `[time_min, time_max)`, with recurring
    /// events expanded into concrete occurrences by the API.
    pub async fn list_events(
        &self,
        access_token: &str,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<GcalEvent>, reqwest::Error> {
        let mut url = reqwest::Url::parse(&self.events_url(calendar_id)).expect("Invalid URL");
        url.query_pairs_mut()
            .append_pair("timeMin", &time_min.to_rfc3339())
            .append_pair("timeMax", &time_max.to_rfc3339())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime")
            .append_pair("maxResults", "2500");

        let resp: ListEventsResponse = Client::new()
            .get(url.as_str())
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // Cancelled occurrences of recurring events can still show up
        let events = resp
            .items
            .unwrap_or_default()
            .into_iter()
            .filter(|e| e.status.as_deref() != Some("cancelled"))
            .collect();
        Ok(events)
    }

    pub async fn insert_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event: &EventWrite,
    ) -> Result<GcalEvent, reqwest::Error> {
        let created = Client::new()
            .post(self.events_url(calendar_id))
            .bearer_auth(access_token)
            .json(event)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(created)
    }

    pub async fn delete_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<(), reqwest::Error> {
        Client::new()
            .delete(format!(
                "{}/{}",
                self.events_url(calendar_id),
                urlencoding::encode(event_id)
            ))
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Patch only the start/end of an event. Every other attribute
    /// (title, description, attendees) is preserved by the API.
    pub async fn patch_event_times(
        &self,
        access_token: &str,
        calendar_id: &str,
        event_id: &str,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Result<GcalEvent, reqwest::Error> {
        let body = json!({
            "start": { "dateTime": new_start.to_rfc3339() },
            "end": { "dateTime": new_end.to_rfc3339() },
        });
        let patched = Client::new()
            .patch(format!(
                "{}/{}",
                self.events_url(calendar_id),
                urlencoding::encode(event_id)
            ))
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(patched)
    }
}
