// Returning-attendee classification

use chrono::{DateTime, FixedOffset};

use crate::entities::AttendeeProfile;

/// An attendee is returning for a given reference date iff their first
/// check-in is strictly before the start of that date's calendar day AND they
/// have checked into more than one event in total. A single check-in can
/// never be a repeat visit, whatever its date.
pub fn is_returning(attendee: &AttendeeProfile, reference_date: &DateTime<FixedOffset>) -> bool {
    if attendee.total_events_checked_in <= 1 {
        return false;
    }
    let Some(first_checkin) = attendee.first_checkin else {
        return false;
    };
    let day_start = reference_date
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(*reference_date.offset()).single());
    let Some(day_start) = day_start else {
        return false;
    };
    first_checkin < day_start
}

/// Missing or invalid first-check-in dates are excluded, never an error.
pub fn count_returning(
    attendees: &[AttendeeProfile],
    reference_date: &DateTime<FixedOffset>,
) -> u64 {
    attendees
        .iter()
        .filter(|attendee| is_returning(attendee, reference_date))
        .count() as u64
}

/// The dashboard's return-rate formula: `round(100 * (1 - returning/total))`.
/// It divides a head-count of returning attendees by a cumulative check-in
/// count, so the result is not a clean "fraction of attendees" and can go
/// negative. Kept as-is pending product review (see DESIGN.md).
pub fn global_return_rate_percent(total_check_ins: u64, returning_user_count: u64) -> i64 {
    if total_check_ins == 0 {
        return 0;
    }
    let fraction = 1.0 - returning_user_count as f64 / total_check_ins as f64;
    (100.0 * fraction).round() as i64
}
