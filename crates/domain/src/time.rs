//! Timestamps attached to persisted documents and write-back reports.

use chrono::{DateTime, SecondsFormat, Utc};

/// UTC instant.
pub type Timestamp = DateTime<Utc>;

#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Text form stored next to a persisted document, e.g.
/// `2024-05-01T12:30:00.125Z`.
#[must_use]
pub fn stamp(at: Timestamp) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
