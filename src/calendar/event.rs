//! Core calendar types shared across the reader, finder, and mutations

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A single calendar event, tagged with the account it came from.
///
/// Interval arithmetic is always done on the UTC instants; the
/// configured time zone is only used for anchoring calendar days and
/// rendering. An event is never mutated in place, a reschedule writes
/// new times to the backend and the in-memory value is discarded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: String,
    /// Which configured calendar account this event belongs to.
    /// Required later to target a cancel or reschedule.
    pub source_id: String,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// True for date-only events. These are normalized to local
    /// start/end of day and never block free-slot candidates.
    pub all_day: bool,
}

/// An open interval within the working-hours window where a new
/// event of the requested duration would fit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The configured `[min_hour, max_hour)` window within which free
/// slots and new events are considered valid. A policy constant, not
/// per-request configurable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorkingHours {
    pub min_hour: u32,
    pub max_hour: u32,
}

impl WorkingHours {
    pub fn new(min_hour: u32, max_hour: u32) -> Self {
        Self { min_hour, max_hour }
    }

    /// Compute the absolute `[date@min_hour, date@max_hour)` window
    /// for a calendar day in the given time zone.
    pub fn window_for(&self, date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = local_instant(date, self.min_hour, 0, 0, tz);
        let end = local_instant(date, self.max_hour, 0, 0, tz);
        (start, end)
    }
}

/// The `[00:00:00, 23:59:59.999]` bounds of a calendar date in the
/// given time zone, as UTC instants.
pub fn day_bounds(date: NaiveDate, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_instant(date, 0, 0, 0, tz);
    let end = local_instant(date, 23, 59, 59, tz) + Duration::milliseconds(999);
    (start, end)
}

/// Resolve a local wall-clock time to a UTC instant. On a DST gap or
/// fold, take the earliest valid instant.
pub fn local_instant(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> DateTime<Utc> {
    // An hour of 24 (window ending at midnight) rolls to the next day
    let (date, hour) = if hour >= 24 {
        (date + Duration::days(1), hour - 24)
    } else {
        (date, hour)
    };
    let naive = date.and_time(NaiveTime::from_hms_opt(hour, min, sec).expect("valid time"));
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
        .with_timezone(&Utc)
}
