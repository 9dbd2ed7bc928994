//! Multi-calendar reader: query every configured account over a time
//! window, tag, normalize, and merge into one chronological list

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use futures::future::join_all;
use regex::Regex;

use super::backend::CalendarBackend;
use super::error::{CalendarError, Result};
use super::event::{Event, day_bounds};

pub struct MultiCalendarReader {
    sources: Vec<Arc<dyn CalendarBackend>>,
    tz: Tz,
}

impl MultiCalendarReader {
    pub fn new(sources: Vec<Arc<dyn CalendarBackend>>, tz: Tz) -> Self {
        Self { sources, tz }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// The first-configured source, which new events are written to.
    pub fn primary_source(&self) -> Result<&Arc<dyn CalendarBackend>> {
        self.sources
            .first()
            .ok_or_else(|| CalendarError::InvalidInput("no calendar sources configured".into()))
    }

    pub fn source(&self, source_id: &str) -> Result<&Arc<dyn CalendarBackend>> {
        self.sources
            .iter()
            .find(|s| s.source_id() == source_id)
            .ok_or_else(|| CalendarError::InvalidInput(format!(
                "unknown calendar source '{}'",
                source_id
            )))
    }

    /// Events from every source overlapping `[start, end)`, sorted
    /// ascending by start instant. Equal starts keep source
    /// configuration order, so the merge is deterministic no matter
    /// the order sources respond in. A failing source contributes
    /// zero events; only when every source fails does the read error.
    pub async fn list_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Event>> {
        if start >= end {
            return Ok(vec![]);
        }

        // Sources are independent read-only accounts, so the queries
        // can be dispatched concurrently. join_all preserves source
        // order in its output.
        let results = join_all(self.sources.iter().map(|s| s.list_events(start, end))).await;

        let mut merged = Vec::new();
        let mut failures = 0;
        for (source, result) in self.sources.iter().zip(results) {
            match result {
                Ok(events) => merged.extend(events.into_iter().map(strip_links)),
                Err(err) => {
                    failures += 1;
                    tracing::warn!(
                        "Calendar source '{}' failed to answer, skipping: {}",
                        source.source_id(),
                        err
                    );
                }
            }
        }

        if failures > 0 && failures == self.sources.len() {
            return Err(CalendarError::AllSourcesUnavailable);
        }

        // Stable sort keeps concatenation (= configuration) order for
        // equal start instants
        merged.sort_by_key(|e| e.start);
        Ok(merged)
    }

    /// All events on a calendar date, `[00:00:00, 23:59:59.999]`
    /// local time.
    pub async fn list_events_for_day(&self, date: NaiveDate) -> Result<Vec<Event>> {
        let (start, end) = day_bounds(date, self.tz);
        self.list_events(start, end).await
    }
}

/// Remove embedded URLs from the free-text fields. Raw links never
/// surface downstream, which keeps chat clients from rendering link
/// previews for video-call boilerplate.
fn strip_links(mut event: Event) -> Event {
    let re = Regex::new(r"\s*https?://\S+").unwrap();
    event.title = re.replace_all(&event.title, "").trim().to_string();
    event.description = re.replace_all(&event.description, "").trim().to_string();
    if let Some(location) = &event.location {
        let cleaned = re.replace_all(location, "").trim().to_string();
        event.location = if cleaned.is_empty() { None } else { Some(cleaned) };
    }
    event
}
