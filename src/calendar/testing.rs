//! In-memory backend and fixtures shared by the calendar unit tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::backend::{CalendarBackend, NewEvent};
use super::error::{CalendarError, Result};
use super::event::Event;
use super::reader::MultiCalendarReader;

/// A backend over a fixed in-memory event list, or one that always
/// fails, for exercising merge/slot/search/mutation logic without a
/// network.
pub struct StaticBackend {
    id: String,
    pub events: Mutex<Vec<Event>>,
    fail: bool,
}

impl StaticBackend {
    pub fn with_events(id: &str, events: Vec<Event>) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            events: Mutex::new(events),
            fail: false,
        })
    }

    pub fn failing(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            events: Mutex::new(vec![]),
            fail: true,
        })
    }
}

#[async_trait]
impl CalendarBackend for StaticBackend {
    fn source_id(&self) -> &str {
        &self.id
    }

    async fn list_events(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Event>> {
        if self.fail {
            return Err(CalendarError::SourceUnavailable {
                source: self.id.clone(),
                reason: "static backend configured to fail".to_string(),
            });
        }
        let events = self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.start < end && e.end > start)
            .cloned()
            .collect();
        Ok(events)
    }

    async fn insert_event(&self, event: NewEvent) -> Result<Event> {
        let created = Event {
            id: format!("evt-{}", self.events.lock().unwrap().len() + 1),
            source_id: self.id.clone(),
            title: event.title,
            description: event.description.unwrap_or_default(),
            location: event.location,
            start: event.start,
            end: event.end,
            all_day: false,
        };
        self.events.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn delete_event(&self, event_id: &str) -> Result<()> {
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| e.id != event_id);
        if events.len() == before {
            return Err(CalendarError::NotFound {
                source: self.id.clone(),
                event: event_id.to_string(),
            });
        }
        Ok(())
    }

    async fn patch_event_times(
        &self,
        event_id: &str,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Result<Event> {
        let mut events = self.events.lock().unwrap();
        let event = events
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| CalendarError::NotFound {
                source: self.id.clone(),
                event: event_id.to_string(),
            })?;
        event.start = new_start;
        event.end = new_end;
        Ok(event.clone())
    }
}

pub fn reader_over(sources: Vec<Arc<StaticBackend>>) -> MultiCalendarReader {
    let sources: Vec<Arc<dyn CalendarBackend>> = sources
        .into_iter()
        .map(|s| s as Arc<dyn CalendarBackend>)
        .collect();
    MultiCalendarReader::new(sources, Tz::UTC)
}

/// A timed event on 2025-06-02 spanning `[start_hour, end_hour)` UTC.
pub fn event_at(id: &str, source_id: &str, start_hour: u32, end_hour: u32) -> Event {
    Event {
        id: id.to_string(),
        source_id: source_id.to_string(),
        title: format!("Event {}", id),
        description: String::new(),
        location: None,
        start: Utc.with_ymd_and_hms(2025, 6, 2, start_hour, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2025, 6, 2, end_hour, 0, 0).unwrap(),
        all_day: false,
    }
}
