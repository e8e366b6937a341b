// Analytics snapshot entity

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::{AggregateMetrics, AttendeeProfile, EventMetadata};

/// The canonical in-memory view of one owner's analytics: events, attendees
/// and the metrics derived from them, all computed from the same fetch.
/// Always replaced as a whole so readers never observe a torn mix of two
/// generations.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSnapshot {
    pub events: Vec<EventMetadata>,
    pub attendees: Vec<AttendeeProfile>,
    pub metrics: AggregateMetrics,
    pub fetched_at: DateTime<Utc>,
}
