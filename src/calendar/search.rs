//! Fuzzy event matching for resolving a short phrase like "the
//! sergio call" to concrete events

use chrono::{Duration, Utc};

use super::error::Result;
use super::event::Event;
use super::reader::MultiCalendarReader;

pub const DEFAULT_DAYS_BACK: i64 = 1;
pub const DEFAULT_DAYS_FORWARD: i64 = 30;

/// Query words that carry no signal about which event is meant:
/// articles, prepositions, and the scheduling verbs users wrap their
/// requests in.
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "to", "for", "with", "on", "at", "in", "of", "from", "about", "my", "our",
    "that", "this", "please", "cancel", "move", "reschedule", "delete", "remove", "book",
    "schedule", "meeting", "appointment", "event",
];

/// Two-tier match against title + description. Tier 1: the whole
/// query appears verbatim (case-insensitive). Tier 2: after dropping
/// stopwords, every remaining token appears somewhere as a substring.
/// A query that was all stopwords never matches via tier 2.
pub fn matches_query(query_lower: &str, event: &Event) -> bool {
    let haystack = format!("{} {}", event.title, event.description).to_lowercase();
    if haystack.contains(query_lower) {
        return true;
    }
    let tokens: Vec<&str> = query_lower
        .split_whitespace()
        .filter(|t| !STOPWORDS.contains(t))
        .collect();
    !tokens.is_empty() && tokens.iter().all(|t| haystack.contains(t))
}

/// All events matching `query` in a window around now, chronological.
/// Not deduplicated across sources: the same event on two accounts is
/// two results, since the accounts are independent.
pub async fn search_events_by_text(
    reader: &MultiCalendarReader,
    query: &str,
    days_back: i64,
    days_forward: i64,
) -> Result<Vec<Event>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Ok(vec![]);
    }
    let now = Utc::now();
    let events = reader
        .list_events(now - Duration::days(days_back), now + Duration::days(days_forward))
        .await?;
    Ok(events
        .into_iter()
        .filter(|e| matches_query(&query, e))
        .collect())
}
