//! Public types for the calendar read API
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::{Event, FreeSlot};

#[derive(Deserialize)]
pub struct DayQuery {
    pub date: NaiveDate,
}

#[derive(Deserialize)]
pub struct RangeQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
    /// Duration in minutes
    pub duration: i64,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub query: String,
    pub days_back: Option<i64>,
    pub days_forward: Option<i64>,
}

#[derive(Serialize, Deserialize)]
pub struct EventResponse {
    pub id: String,
    pub source_id: String,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    // Datetimes rendered in the configured display time zone
    pub start: String,
    pub end: String,
    pub all_day: bool,
}

impl EventResponse {
    pub fn from_event(event: Event, tz: Tz) -> Self {
        Self {
            id: event.id,
            source_id: event.source_id,
            title: event.title,
            description: event.description,
            location: event.location,
            start: event.start.with_timezone(&tz).to_rfc3339(),
            end: event.end.with_timezone(&tz).to_rfc3339(),
            all_day: event.all_day,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct SlotResponse {
    pub start: String,
    pub end: String,
}

impl SlotResponse {
    pub fn from_slot(slot: FreeSlot, tz: Tz) -> Self {
        Self {
            start: slot.start.with_timezone(&tz).to_rfc3339(),
            end: slot.end.with_timezone(&tz).to_rfc3339(),
        }
    }
}
