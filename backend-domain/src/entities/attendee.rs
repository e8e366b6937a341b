// Attendee profile entity
// One row per distinct attendee, scoped to an owner, recomputed server-side
// whenever new events are ingested

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Row shape as returned by the hosted `attendeeProfile` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAttendeeRow {
    #[serde(default)]
    pub userid: Option<String>,
    #[serde(default)]
    pub cleaned_email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name_guess: Option<String>,
    #[serde(default)]
    pub last_name_guess: Option<String>,
    #[serde(default)]
    pub first_checkin_date: Option<String>,
    #[serde(default)]
    pub last_checkin_date: Option<String>,
    /// Stored as a decimal string upstream ("3", sometimes "3.0").
    #[serde(default)]
    pub total_events_checked_in: Option<Value>,
    #[serde(default)]
    pub count_events_approved_not_checked_in: Option<Value>,
    #[serde(default)]
    pub count_events_declined: Option<Value>,
    #[serde(default)]
    pub count_events_invited: Option<Value>,
    #[serde(default)]
    pub count_events_waitlisted: Option<Value>,
    #[serde(default)]
    pub checked_in_event_names_array: Option<Vec<String>>,
    #[serde(default)]
    pub all_feedback_structured: Option<Vec<RawFeedbackEntry>>,
    #[serde(default)]
    pub all_custom_data: Option<Value>,
    #[serde(default)]
    pub average_rating: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFeedbackEntry {
    #[serde(default)]
    pub eventname: Option<String>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub response: Option<String>,
}

/// Normalized attendee profile. Each fetch is a full replacement snapshot,
/// never a partial patch.
///
/// `total_events_checked_in` is expected to be >= the length of
/// `checked_in_event_names` but the source does not enforce it; downstream
/// logic must tolerate the two disagreeing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendeeProfile {
    pub user_ref_id: String,
    pub cleaned_email: String,
    /// Best-effort guess: name, else first+last guess, else email, else "Anonymous".
    pub display_name: String,
    pub first_checkin: Option<DateTime<FixedOffset>>,
    pub last_checkin: Option<DateTime<FixedOffset>>,
    pub total_events_checked_in: u64,
    pub approved_not_checked_in: u64,
    pub declined: u64,
    pub invited: u64,
    pub waitlisted: u64,
    /// Ordered as delivered by the source.
    pub checked_in_event_names: Vec<String>,
    pub feedback: Vec<FeedbackEntry>,
    /// Keyed by event identifier; free-form key/value pairs from the CSV.
    pub custom_fields_by_event: HashMap<String, HashMap<String, String>>,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackEntry {
    pub event_name: String,
    /// 0-5 stars.
    pub rating: u8,
    pub response_text: String,
}

impl AttendeeProfile {
    pub fn checked_into(&self, event_name: &str) -> bool {
        self.checked_in_event_names
            .iter()
            .any(|name| name == event_name)
    }
}
