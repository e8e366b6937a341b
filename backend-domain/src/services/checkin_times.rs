// Check-in time-of-day statistics

use chrono::Timelike;

use crate::entities::{AttendeeProfile, CheckinTimeStats};

/// Average/earliest/latest first-check-in wall-clock time across a set of
/// attendees. Times are read from each timestamp's own clock (the offset the
/// source recorded), reduced to minutes since midnight. Pure function; no
/// valid timestamps means "N/A" across the board.
pub fn checkin_time_stats(attendees: &[AttendeeProfile]) -> CheckinTimeStats {
    let minutes: Vec<u32> = attendees
        .iter()
        .filter_map(|attendee| attendee.first_checkin)
        .map(|checkin| checkin.hour() * 60 + checkin.minute())
        .collect();

    if minutes.is_empty() {
        return CheckinTimeStats::unavailable();
    }

    let total: u64 = minutes.iter().map(|&minute| u64::from(minute)).sum();
    let average = (total as f64 / minutes.len() as f64).round() as u32;
    let earliest = minutes.iter().copied().min().unwrap_or(0);
    let latest = minutes.iter().copied().max().unwrap_or(0);

    CheckinTimeStats {
        average: format_clock(average),
        earliest: format_clock(earliest),
        latest: format_clock(latest),
    }
}

/// Minutes-since-midnight to a 12-hour clock string, e.g. 0 -> "12:00 AM",
/// 810 -> "1:30 PM".
fn format_clock(minutes_since_midnight: u32) -> String {
    let hour = (minutes_since_midnight / 60) % 24;
    let minute = minutes_since_midnight % 60;
    let hour_of_12 = match hour % 12 {
        0 => 12,
        other => other,
    };
    let period = if hour < 12 { "AM" } else { "PM" };
    format!("{}:{:02} {}", hour_of_12, minute, period)
}
