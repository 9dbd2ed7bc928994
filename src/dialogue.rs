//! One chat message in, one reply out
//!
//! Each message is handled independently and to completion. The only
//! state carried between messages is the pending-choice session used
//! to disambiguate an ambiguous cancel/reschedule target by number.

use anyhow::{Error, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::action::{Action, ActionOutcome, Assistant};
use crate::calendar::{CalendarError, Event, FreeSlot};
use crate::nlu::IntentClassifier;
use crate::session::{PendingChoice, PendingChoices, PendingIntent};

pub async fn handle_message(
    assistant: &Assistant,
    classifier: &dyn IntentClassifier,
    pending: &PendingChoices,
    conversation_id: &str,
    message: &str,
    now: DateTime<Utc>,
) -> Result<String, Error> {
    let tz = assistant.reader().tz();
    let trimmed = message.trim();

    // A bare number is an answer to an earlier "which one?" question
    if let Ok(n) = trimmed.parse::<usize>() {
        let Some(choice) = pending.take(conversation_id) else {
            return Ok("There's nothing to pick from right now.".to_string());
        };
        if n == 0 || n > choice.candidates.len() {
            return Ok(format!(
                "That's not one of the options, pick a number from 1 to {}.",
                choice.candidates.len()
            ));
        }
        let event = &choice.candidates[n - 1];
        let result = match &choice.intent {
            PendingIntent::Cancel => assistant.cancel(event).await,
            PendingIntent::Reschedule(request) => assistant.reschedule(event, request).await,
        };
        return Ok(match result {
            Ok(outcome) => render_outcome(&outcome, tz),
            Err(err) => render_failure(&err),
        });
    }

    let request = classifier.classify(message, now).await?;
    let outcome = match assistant.execute(&request).await {
        Ok(outcome) => outcome,
        Err(err) => return Ok(render_failure(&err)),
    };

    if let ActionOutcome::Candidates { candidates } = &outcome {
        let intent = match request.action {
            Action::RescheduleEvent => PendingIntent::Reschedule(request.clone()),
            _ => PendingIntent::Cancel,
        };
        pending.insert(
            conversation_id,
            PendingChoice {
                candidates: candidates.clone(),
                intent,
            },
        );
    }

    Ok(render_outcome(&outcome, tz))
}

/// Render a structured outcome as plain chat text. The reader has
/// already stripped URLs so nothing here triggers link previews.
pub fn render_outcome(outcome: &ActionOutcome, tz: Tz) -> String {
    match outcome {
        ActionOutcome::Events { events } if events.is_empty() => {
            "Nothing on the calendar for that time.".to_string()
        }
        ActionOutcome::Events { events } => {
            let lines: Vec<String> = events.iter().map(|e| format_event(e, tz)).collect();
            lines.join("\n")
        }
        ActionOutcome::Slots { slots } if slots.is_empty() => {
            "No open slots that day, sorry.".to_string()
        }
        ActionOutcome::Slots { slots } => {
            let lines: Vec<String> = slots.iter().map(|s| format_slot(s, tz)).collect();
            format!("You're free at:\n{}", lines.join("\n"))
        }
        ActionOutcome::Created { event } => {
            format!("Booked: {}", format_event(event, tz))
        }
        ActionOutcome::Cancelled { event } => {
            format!("Cancelled \"{}\".", event.title)
        }
        ActionOutcome::Rescheduled { event } => {
            format!("Moved: {}", format_event(event, tz))
        }
        ActionOutcome::Candidates { candidates } => {
            let lines: Vec<String> = candidates
                .iter()
                .enumerate()
                .map(|(i, e)| format!("{}. {}", i + 1, format_event(e, tz)))
                .collect();
            format!("I found more than one, which did you mean?\n{}", lines.join("\n"))
        }
        ActionOutcome::NoMatch { query } => {
            format!("I couldn't find anything matching \"{}\".", query)
        }
    }
}

fn render_failure(err: &CalendarError) -> String {
    match err {
        CalendarError::InvalidInput(msg) => format!("I can't do that: {}.", msg),
        CalendarError::NotFound { .. } => {
            "Sorry, that event doesn't seem to exist anymore.".to_string()
        }
        _ => "Sorry, I couldn't reach your calendars just now. Try again in a bit.".to_string(),
    }
}

fn format_event(event: &Event, tz: Tz) -> String {
    if event.all_day {
        return format!(
            "{} (all day): {}",
            event.start.with_timezone(&tz).format("%a %b %-d"),
            event.title
        );
    }
    format!(
        "{} to {}: {}",
        event.start.with_timezone(&tz).format("%a %b %-d %H:%M"),
        event.end.with_timezone(&tz).format("%H:%M"),
        event.title
    )
}

fn format_slot(slot: &FreeSlot, tz: Tz) -> String {
    format!(
        "{} to {}",
        slot.start.with_timezone(&tz).format("%a %b %-d %H:%M"),
        slot.end.with_timezone(&tz).format("%H:%M")
    )
}
