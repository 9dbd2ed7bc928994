//! Structured action requests and their execution
//!
//! The NLU collaborator turns free text into an `ActionRequest`; this
//! module executes it against the calendar sources and returns a
//! structured `ActionOutcome` for the presentation layer to render.
//! No natural language is parsed here.

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::calendar::backend::NewEvent;
use crate::calendar::error::{CalendarError, Result};
use crate::calendar::event::local_instant;
use crate::calendar::search::{DEFAULT_DAYS_BACK, DEFAULT_DAYS_FORWARD, search_events_by_text};
use crate::calendar::slots::{DEFAULT_SLOT_LIMIT, find_open_slots};
use crate::calendar::{Event, FreeSlot, MultiCalendarReader, WorkingHours, day_bounds, ops};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    DaySummary,
    RangeSummary,
    FindFreeTime,
    CreateEvent,
    CancelEvent,
    RescheduleEvent,
}

/// The structured request shape produced by the intent classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: Action,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// Duration in minutes.
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub range_start: Option<NaiveDate>,
    #[serde(default)]
    pub range_end: Option<NaiveDate>,
    /// Short phrase identifying an existing event, resolved through
    /// the fuzzy matcher.
    #[serde(default)]
    pub target_event: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionOutcome {
    Events { events: Vec<Event> },
    Slots { slots: Vec<FreeSlot> },
    Created { event: Event },
    Cancelled { event: Event },
    Rescheduled { event: Event },
    /// The target phrase matched more than one event. Multiplicity is
    /// resolved by the dialogue layer, not here.
    Candidates { candidates: Vec<Event> },
    /// The target phrase matched nothing in the search window.
    NoMatch { query: String },
}

pub struct Assistant {
    reader: MultiCalendarReader,
    hours: WorkingHours,
}

impl Assistant {
    pub fn new(reader: MultiCalendarReader, hours: WorkingHours) -> Self {
        Self { reader, hours }
    }

    pub fn reader(&self) -> &MultiCalendarReader {
        &self.reader
    }

    pub fn working_hours(&self) -> WorkingHours {
        self.hours
    }

    pub async fn execute(&self, request: &ActionRequest) -> Result<ActionOutcome> {
        match request.action {
            Action::DaySummary => {
                let date = require(request.date, "date")?;
                let events = self.reader.list_events_for_day(date).await?;
                Ok(ActionOutcome::Events { events })
            }
            Action::RangeSummary => {
                let range_start = require(request.range_start, "range_start")?;
                let range_end = require(request.range_end, "range_end")?;
                if range_end < range_start {
                    return Err(CalendarError::InvalidInput(format!(
                        "range end {} is before range start {}",
                        range_end, range_start
                    )));
                }
                let (start, _) = day_bounds(range_start, self.reader.tz());
                let (_, end) = day_bounds(range_end, self.reader.tz());
                let events = self.reader.list_events(start, end).await?;
                Ok(ActionOutcome::Events { events })
            }
            Action::FindFreeTime => {
                let date = require(request.date, "date")?;
                let duration = require(request.duration, "duration")?;
                let slots =
                    find_open_slots(&self.reader, date, duration, DEFAULT_SLOT_LIMIT, self.hours)
                        .await?;
                Ok(ActionOutcome::Slots { slots })
            }
            Action::CreateEvent => {
                let title = request
                    .title
                    .clone()
                    .ok_or_else(|| CalendarError::InvalidInput("missing field 'title'".into()))?;
                let date = require(request.date, "date")?;
                let start_time = require(request.start_time, "start_time")?;
                let duration = require(request.duration, "duration")?;
                if duration <= 0 {
                    return Err(CalendarError::InvalidInput(format!(
                        "duration must be positive, got {}",
                        duration
                    )));
                }
                let start = local_instant(
                    date,
                    start_time.hour(),
                    start_time.minute(),
                    start_time.second(),
                    self.reader.tz(),
                );
                let event = ops::create_event(
                    &self.reader,
                    NewEvent {
                        title,
                        description: None,
                        location: None,
                        start,
                        end: start + Duration::minutes(duration),
                    },
                )
                .await?;
                Ok(ActionOutcome::Created { event })
            }
            Action::CancelEvent => {
                let target = require_str(&request.target_event, "target_event")?;
                match self.resolve_target(target).await? {
                    Resolution::None => Ok(ActionOutcome::NoMatch {
                        query: target.to_string(),
                    }),
                    Resolution::One(event) => self.cancel(&event).await,
                    Resolution::Many(candidates) => Ok(ActionOutcome::Candidates { candidates }),
                }
            }
            Action::RescheduleEvent => {
                let target = require_str(&request.target_event, "target_event")?;
                match self.resolve_target(target).await? {
                    Resolution::None => Ok(ActionOutcome::NoMatch {
                        query: target.to_string(),
                    }),
                    Resolution::One(event) => self.reschedule(&event, request).await,
                    Resolution::Many(candidates) => Ok(ActionOutcome::Candidates { candidates }),
                }
            }
        }
    }

    /// Complete a cancel against an already-resolved event, e.g.
    /// after the user picked a candidate by number.
    pub async fn cancel(&self, event: &Event) -> Result<ActionOutcome> {
        ops::cancel_event_by_id(&self.reader, &event.source_id, &event.id).await?;
        Ok(ActionOutcome::Cancelled {
            event: event.clone(),
        })
    }

    /// Complete a reschedule against an already-resolved event. The
    /// new start comes from the request; a missing duration keeps the
    /// event's current length.
    pub async fn reschedule(
        &self,
        event: &Event,
        request: &ActionRequest,
    ) -> Result<ActionOutcome> {
        let date = require(request.date, "date")?;
        let start_time = require(request.start_time, "start_time")?;
        let new_start = local_instant(
            date,
            start_time.hour(),
            start_time.minute(),
            start_time.second(),
            self.reader.tz(),
        );
        let length = match request.duration {
            Some(minutes) if minutes > 0 => Duration::minutes(minutes),
            Some(minutes) => {
                return Err(CalendarError::InvalidInput(format!(
                    "duration must be positive, got {}",
                    minutes
                )));
            }
            None => event.end - event.start,
        };
        let updated = ops::reschedule_event_by_id(
            &self.reader,
            &event.source_id,
            &event.id,
            new_start,
            new_start + length,
        )
        .await?;
        Ok(ActionOutcome::Rescheduled { event: updated })
    }

    async fn resolve_target(&self, target: &str) -> Result<Resolution> {
        let mut matches =
            search_events_by_text(&self.reader, target, DEFAULT_DAYS_BACK, DEFAULT_DAYS_FORWARD)
                .await?;
        Ok(match matches.len() {
            0 => Resolution::None,
            1 => Resolution::One(matches.remove(0)),
            _ => Resolution::Many(matches),
        })
    }
}

enum Resolution {
    None,
    One(Event),
    Many(Vec<Event>),
}

fn require<T: Copy>(field: Option<T>, name: &str) -> Result<T> {
    field.ok_or_else(|| CalendarError::InvalidInput(format!("missing field '{}'", name)))
}

fn require_str<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CalendarError::InvalidInput(format!("missing field '{}'", name)))
}
