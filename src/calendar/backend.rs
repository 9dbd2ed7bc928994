//! Backend seam for one calendar account
//!
//! Each configured account gets its own `CalendarBackend`, scoped to
//! that account's credential. The reader and mutation operations only
//! ever talk to this trait, which keeps the interval arithmetic and
//! matching logic testable without a network.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tokio_rusqlite::Connection;

use super::error::{CalendarError, Result};
use super::event::{Event, local_instant};
use crate::db::find_refresh_token;
use crate::google::gcal::{EventTime, EventWrite, GcalClient, GcalEvent};
use crate::google::oauth::refresh_access_token;

/// Fields for a new event write. The backend assigns the id.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[async_trait]
pub trait CalendarBackend: Send + Sync {
    /// The configured account this backend is scoped to.
    fn source_id(&self) -> &str;

    /// Events whose occurrence overlaps `[start, end)`, recurring
    /// events already expanded into concrete occurrences.
    async fn list_events(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Event>>;

    async fn insert_event(&self, event: NewEvent) -> Result<Event>;

    async fn delete_event(&self, event_id: &str) -> Result<()>;

    /// Patch only the time fields, preserving every other attribute.
    async fn patch_event_times(
        &self,
        event_id: &str,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Result<Event>;
}

/// Google Calendar implementation. Holds the account id, refreshes
/// an access token from the stored refresh token on each call, and
/// operates on that account's primary calendar.
pub struct GcalBackend {
    account_id: String,
    client: GcalClient,
    db: Connection,
    token_url: String,
    client_id: String,
    client_secret: String,
    tz: Tz,
}

impl GcalBackend {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_id: &str,
        api_base_url: &str,
        db: Connection,
        token_url: &str,
        client_id: &str,
        client_secret: &str,
        tz: Tz,
    ) -> Self {
        Self {
            account_id: account_id.to_string(),
            client: GcalClient::new(api_base_url),
            db,
            token_url: token_url.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            tz,
        }
    }

    async fn access_token(&self) -> Result<String> {
        let refresh_token = find_refresh_token(&self.db, &self.account_id)
            .await
            .map_err(|e| CalendarError::Backend(format!(
                "no stored credential for '{}': {}",
                self.account_id, e
            )))?;
        let token = refresh_access_token(
            &self.token_url,
            &self.client_id,
            &self.client_secret,
            &refresh_token,
        )
        .await
        .map_err(|e| self.classify(e, None))?;
        Ok(token.access_token)
    }

    /// Map an HTTP failure onto the error taxonomy. 404/410 on a
    /// mutation means the backend rejected the id pair; everything
    /// else is a transient backend failure.
    fn classify(&self, err: reqwest::Error, event_id: Option<&str>) -> CalendarError {
        if let (Some(status), Some(event_id)) = (err.status(), event_id)
            && (status.as_u16() == 404 || status.as_u16() == 410)
        {
            return CalendarError::NotFound {
                source: self.account_id.clone(),
                event: event_id.to_string(),
            };
        }
        CalendarError::Backend(err.to_string())
    }

    /// Convert a wire event to the domain shape, dropping anything
    /// without usable start/end. All-day (date-only) events become
    /// explicit local start-of-day/end-of-day instants; the API's end
    /// date is exclusive.
    fn to_event(&self, raw: GcalEvent) -> Option<Event> {
        let start = raw.start?;
        let end = raw.end?;
        let (start, end, all_day) = match (start.date_time, end.date_time) {
            (Some(s), Some(e)) => (s.with_timezone(&Utc), e.with_timezone(&Utc), false),
            _ => {
                let (sd, ed) = (start.date?, end.date?);
                let s = local_instant(sd, 0, 0, 0, self.tz);
                let e = local_instant(ed - Duration::days(1), 23, 59, 59, self.tz)
                    + Duration::milliseconds(999);
                (s, e, true)
            }
        };
        Some(Event {
            id: raw.id,
            source_id: self.account_id.clone(),
            title: raw.summary.unwrap_or_else(|| "No title".to_string()),
            description: raw.description.unwrap_or_default(),
            location: raw.location,
            start,
            end,
            all_day,
        })
    }
}

#[async_trait]
impl CalendarBackend for GcalBackend {
    fn source_id(&self) -> &str {
        &self.account_id
    }

    async fn list_events(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Event>> {
        let access_token = self.access_token().await?;
        let raw = self
            .client
            .list_events(&access_token, "primary", start, end)
            .await
            .map_err(|e| self.classify(e, None))?;
        Ok(raw.into_iter().filter_map(|e| self.to_event(e)).collect())
    }

    async fn insert_event(&self, event: NewEvent) -> Result<Event> {
        let access_token = self.access_token().await?;
        let write = EventWrite {
            summary: event.title,
            description: event.description,
            location: event.location,
            start: EventTime {
                date_time: Some(event.start.fixed_offset()),
                ..Default::default()
            },
            end: EventTime {
                date_time: Some(event.end.fixed_offset()),
                ..Default::default()
            },
        };
        let created = self
            .client
            .insert_event(&access_token, "primary", &write)
            .await
            .map_err(|e| self.classify(e, None))?;
        self.to_event(created)
            .ok_or_else(|| CalendarError::Backend("created event missing times".to_string()))
    }

    async fn delete_event(&self, event_id: &str) -> Result<()> {
        let access_token = self.access_token().await?;
        self.client
            .delete_event(&access_token, "primary", event_id)
            .await
            .map_err(|e| self.classify(e, Some(event_id)))
    }

    async fn patch_event_times(
        &self,
        event_id: &str,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Result<Event> {
        let access_token = self.access_token().await?;
        let patched = self
            .client
            .patch_event_times(&access_token, "primary", event_id, new_start, new_end)
            .await
            .map_err(|e| self.classify(e, Some(event_id)))?;
        self.to_event(patched)
            .ok_or_else(|| CalendarError::Backend("patched event missing times".to_string()))
    }
}
