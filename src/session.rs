//! Short-lived pending-choice sessions
//!
//! When a cancel or reschedule target is ambiguous, the candidate
//! list is parked here keyed by conversation id until the user picks
//! one by number. Entries are single-use (taken on read) and expire
//! after a TTL, so no process-wide mutable state outlives the
//! exchange.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::action::ActionRequest;
use crate::calendar::Event;

#[derive(Debug, Clone)]
pub enum PendingIntent {
    Cancel,
    /// The original request is kept so the new times survive the
    /// disambiguation round-trip.
    Reschedule(ActionRequest),
}

#[derive(Debug, Clone)]
pub struct PendingChoice {
    pub candidates: Vec<Event>,
    pub intent: PendingIntent,
}

pub struct PendingChoices {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, PendingChoice)>>,
}

impl PendingChoices {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, conversation_id: &str, choice: PendingChoice) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(conversation_id.to_string(), (Instant::now(), choice));
    }

    /// Take the pending choice for a conversation, if present and not
    /// expired. Taking removes it, a second numeric reply gets
    /// nothing.
    pub fn take(&self, conversation_id: &str) -> Option<PendingChoice> {
        let mut entries = self.entries.lock().unwrap();
        let (created_at, choice) = entries.remove(conversation_id)?;
        if created_at.elapsed() > self.ttl {
            return None;
        }
        Some(choice)
    }
}

impl Default for PendingChoices {
    fn default() -> Self {
        // Long enough to type a number, short enough not to surprise
        Self::new(Duration::from_secs(5 * 60))
    }
}
