// Event-level metric aggregation

use crate::entities::{AggregateMetrics, ChartPoint, EventMetadata};
use crate::utils::format_chart_date;

/// Sums event totals into dashboard metrics. Empty input yields all zeros,
/// never an error. `return_rate_percent` needs the attendee set and is filled
/// in by the snapshot assembly (see the store).
pub fn compute_aggregate(events: &[EventMetadata]) -> AggregateMetrics {
    let total_check_ins: u64 = events.iter().map(|event| event.total_attendance).sum();
    let total_rsvps: u64 = events.iter().map(|event| event.total_rsvps).sum();

    let chart_points = events
        .iter()
        .map(|event| ChartPoint {
            date: event
                .event_date
                .as_ref()
                .map(format_chart_date)
                .unwrap_or_default(),
            event_name: event.event_name.clone(),
            attendance: event.total_attendance,
            rsvps: event.total_rsvps,
        })
        .collect();

    AggregateMetrics {
        total_check_ins,
        total_rsvps,
        check_in_rate_percent: percent_of(total_check_ins, total_rsvps),
        number_of_events: events.len() as u64,
        return_rate_percent: 0,
        chart_points,
    }
}

/// Rounded percentage, half away from zero. Deliberately not clamped to 100:
/// walk-ins and re-check-ins push attendance past the RSVP count.
pub fn percent_of(part: u64, whole: u64) -> u64 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{EventId, OwnerId};

    fn event(attendance: u64, rsvps: u64) -> EventMetadata {
        EventMetadata {
            event_id: EventId("ev".to_string()),
            owner_id: OwnerId("owner".to_string()),
            event_name: "Demo night".to_string(),
            event_date: crate::utils::parse_timestamp("2025-04-07 19:30:00+00"),
            event_date_raw: "2025-04-07 19:30:00+00".to_string(),
            total_attendance: attendance,
            total_rsvps: rsvps,
            file_path: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn totals_are_plain_sums() {
        let events = vec![event(80, 100), event(50, 50), event(0, 20)];
        let metrics = compute_aggregate(&events);
        assert_eq!(metrics.total_check_ins, 130);
        assert_eq!(metrics.total_rsvps, 170);
        assert_eq!(metrics.number_of_events, 3);
        assert_eq!(metrics.check_in_rate_percent, 76);
    }

    #[test]
    fn zero_rsvps_means_zero_rate() {
        let metrics = compute_aggregate(&[event(15, 0), event(3, 0)]);
        assert_eq!(metrics.total_check_ins, 18);
        assert_eq!(metrics.check_in_rate_percent, 0);
    }

    #[test]
    fn rate_above_100_is_preserved() {
        let metrics = compute_aggregate(&[event(150, 100)]);
        assert_eq!(metrics.check_in_rate_percent, 150);
    }

    #[test]
    fn empty_input_is_all_zeros() {
        let metrics = compute_aggregate(&[]);
        assert_eq!(metrics, AggregateMetrics::default());
    }

    #[test]
    fn chart_points_follow_input_order_with_blank_unknown_dates() {
        let mut dateless = event(5, 5);
        dateless.event_date = None;
        dateless.event_name = "Mystery".to_string();
        let events = vec![dateless, event(80, 100)];

        let metrics = compute_aggregate(&events);
        assert_eq!(metrics.chart_points.len(), 2);
        assert_eq!(metrics.chart_points[0].date, "");
        assert_eq!(metrics.chart_points[0].event_name, "Mystery");
        assert_eq!(metrics.chart_points[1].date, "2025-04-07");
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        // 5/8 = 62.5% -> 63
        assert_eq!(percent_of(5, 8), 63);
        // 1/3 = 33.33% -> 33
        assert_eq!(percent_of(1, 3), 33);
    }
}
