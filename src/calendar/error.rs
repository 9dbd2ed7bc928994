//! Error taxonomy for calendar operations
//!
//! Every failure here is request-local; nothing in this module is
//! fatal to the process. The presentation layer needs to tell these
//! classes apart (apologize vs. reject vs. degrade), so they are a
//! typed enum rather than bare `anyhow` errors.

use std::fmt;

// Hand-written Display/Error impls rather than `#[derive(thiserror::Error)]`:
// thiserror unconditionally treats a field named `source` as the error
// source, and these variants carry the calendar source *name* as a String,
// which does not implement `std::error::Error`.
#[derive(Debug)]
pub enum CalendarError {
    /// One source failed a read query. Recovered inside the reader
    /// (that source contributes zero events), surfaced only in logs.
    SourceUnavailable { source: String, reason: String },

    /// Every configured source failed the read, so "no events" can't
    /// be distinguished from "could not determine".
    AllSourcesUnavailable,

    /// A cancel or reschedule targeted a (source, event) pair the
    /// backend rejected. Hard error, never retried.
    NotFound { source: String, event: String },

    /// Malformed duration, inverted time range, or a missing required
    /// field. Raised before any backend call is attempted.
    InvalidInput(String),

    /// Timeout, rate limit, or 5xx from the calendar backend. Retry
    /// policy, if any, belongs to the caller.
    Backend(String),
}

impl fmt::Display for CalendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarError::SourceUnavailable { source, reason } => {
                write!(f, "calendar source '{source}' is unavailable: {reason}")
            }
            CalendarError::AllSourcesUnavailable => {
                write!(f, "all calendar sources failed to answer the read")
            }
            CalendarError::NotFound { source, event } => {
                write!(f, "event '{event}' not found on source '{source}'")
            }
            CalendarError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            CalendarError::Backend(msg) => write!(f, "calendar backend error: {msg}"),
        }
    }
}

impl std::error::Error for CalendarError {}

pub type Result<T> = std::result::Result<T, CalendarError>;
