//! Mutation operations: thin writes against one calendar source

use chrono::{DateTime, Utc};

use super::backend::NewEvent;
use super::error::{CalendarError, Result};
use super::event::Event;
use super::reader::MultiCalendarReader;

/// Write a new event to the primary (first-configured) source.
/// Structural invariants are checked before any backend call;
/// business rules like working-hours placement belong to the caller.
pub async fn create_event(reader: &MultiCalendarReader, event: NewEvent) -> Result<Event> {
    if event.title.trim().is_empty() {
        return Err(CalendarError::InvalidInput("event title is required".into()));
    }
    if event.start >= event.end {
        return Err(CalendarError::InvalidInput(format!(
            "event start {} is not before end {}",
            event.start, event.end
        )));
    }
    reader.primary_source()?.insert_event(event).await
}

/// Delete an event. Both identifiers are required, obtained from a
/// prior reader or matcher result; a backend rejection (not found,
/// already deleted, permission denied) is a hard error, not retried.
pub async fn cancel_event_by_id(
    reader: &MultiCalendarReader,
    source_id: &str,
    event_id: &str,
) -> Result<()> {
    reader.source(source_id)?.delete_event(event_id).await
}

/// Patch only the time fields of an event, preserving title,
/// description, and attendees.
pub async fn reschedule_event_by_id(
    reader: &MultiCalendarReader,
    source_id: &str,
    event_id: &str,
    new_start: DateTime<Utc>,
    new_end: DateTime<Utc>,
) -> Result<Event> {
    if new_start >= new_end {
        return Err(CalendarError::InvalidInput(format!(
            "new start {} is not before new end {}",
            new_start, new_end
        )));
    }
    reader
        .source(source_id)?
        .patch_event_times(event_id, new_start, new_end)
        .await
}
