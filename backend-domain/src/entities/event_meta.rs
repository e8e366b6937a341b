// Event metadata entity
// One row per uploaded event, summarized server-side from the attendance CSV

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_objects::{EventId, OwnerId};

/// Row shape as returned by the hosted `allMeta` table. Every field is
/// optional at the serde layer; the normalizer decides what is usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEventRow {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub eventid: Option<String>,
    #[serde(default)]
    pub userid: Option<String>,
    #[serde(default)]
    pub eventname: Option<String>,
    #[serde(default)]
    pub eventdate: Option<String>,
    #[serde(default)]
    pub totalattendance: Option<Value>,
    #[serde(default)]
    pub totalrsvps: Option<Value>,
    #[serde(default)]
    pub filepath: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Normalized event snapshot. Immutable from the engine's perspective;
/// refreshed only by a full re-fetch.
///
/// `total_attendance` is NOT guaranteed <= `total_rsvps`: walk-ins and
/// re-check-ins exist, so consumers must not assume the ratio is <= 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventMetadata {
    pub event_id: EventId,
    pub owner_id: OwnerId,
    pub event_name: String,
    /// `None` marks a missing or unparseable source date.
    pub event_date: Option<DateTime<FixedOffset>>,
    /// Source text of the date, kept for display.
    pub event_date_raw: String,
    pub total_attendance: u64,
    pub total_rsvps: u64,
    pub file_path: String,
    pub created_at: Option<DateTime<FixedOffset>>,
}

impl EventMetadata {
    /// Check-ins per RSVP; 0 when there are no RSVPs (safe divide).
    pub fn checkin_ratio(&self) -> f64 {
        if self.total_rsvps > 0 {
            self.total_attendance as f64 / self.total_rsvps as f64
        } else {
            0.0
        }
    }
}
