// Derived dashboard metrics

use serde::Serialize;

/// Event-level totals derived from a set of [`EventMetadata`] plus the
/// returning-attendee rate composed from the attendee set.
///
/// `check_in_rate_percent` can exceed 100: walk-ins and re-check-ins mean
/// attendance is not bounded by RSVPs, and the value is deliberately not
/// clamped.
///
/// [`EventMetadata`]: crate::entities::EventMetadata
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateMetrics {
    pub total_check_ins: u64,
    pub total_rsvps: u64,
    pub check_in_rate_percent: u64,
    pub number_of_events: u64,
    /// Signed: the observed formula divides a head-count by a cumulative
    /// check-in count and can go negative. See DESIGN.md.
    pub return_rate_percent: i64,
    pub chart_points: Vec<ChartPoint>,
}

/// One per-event point for the dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// `%Y-%m-%d`, or empty when the event date is unknown.
    pub date: String,
    pub event_name: String,
    pub attendance: u64,
    pub rsvps: u64,
}

/// Wall-clock check-in timing across a set of attendees, formatted as
/// 12-hour clock strings, or "N/A" for all three when no attendee has a
/// parseable first check-in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckinTimeStats {
    pub average: String,
    pub earliest: String,
    pub latest: String,
}

impl CheckinTimeStats {
    pub const UNAVAILABLE: &'static str = "N/A";

    pub fn unavailable() -> Self {
        Self {
            average: Self::UNAVAILABLE.to_string(),
            earliest: Self::UNAVAILABLE.to_string(),
            latest: Self::UNAVAILABLE.to_string(),
        }
    }
}

/// Per-event attendee breakdown for the past-events view.
#[derive(Debug, Clone, Serialize)]
pub struct EventBreakdown {
    pub event_id: String,
    pub event_name: String,
    /// `%Y-%m-%d`, or empty when unknown.
    pub event_date: String,
    pub total_attendance: u64,
    pub total_rsvps: u64,
    pub checked_in: u64,
    pub returning: u64,
    pub new_attendees: u64,
    pub checkin_times: CheckinTimeStats,
    pub feedback: Vec<EventFeedback>,
}

/// One feedback entry attributed to its reviewer for a single event.
#[derive(Debug, Clone, Serialize)]
pub struct EventFeedback {
    pub attendee_name: String,
    pub rating: u8,
    pub response_text: String,
}
