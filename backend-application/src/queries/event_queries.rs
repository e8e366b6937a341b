use backend_domain::services::{checkin_times, ranking, returning};
use backend_domain::{
    AttendeeProfile, EventBreakdown, EventFeedback, EventListQuery, EventMetadata, EventSortField,
    OwnerQuery, SortDirection,
};

use crate::queries::require_owner;
use crate::{AppError, AppState};

pub async fn list_events(
    state: &AppState,
    query: EventListQuery,
) -> Result<Vec<EventMetadata>, AppError> {
    let owner = require_owner(query.owner)?;
    let snapshot = state.store.fetch(&owner, false).await?;
    let field = query.field.unwrap_or(EventSortField::EventDate);
    let direction = query.direction.unwrap_or(SortDirection::Desc);
    Ok(ranking::sort_by(&snapshot.events, field, direction))
}

/// Per-event attendee breakdown for the past-events view, date-ascending with
/// undated events last.
pub async fn event_breakdowns(
    state: &AppState,
    query: OwnerQuery,
) -> Result<Vec<EventBreakdown>, AppError> {
    let owner = require_owner(query.owner)?;
    let snapshot = state.store.fetch(&owner, false).await?;
    let events = ranking::sort_by(
        &snapshot.events,
        EventSortField::EventDate,
        SortDirection::Asc,
    );
    Ok(events
        .iter()
        .map(|event| breakdown_for(event, &snapshot.attendees))
        .collect())
}

fn breakdown_for(event: &EventMetadata, attendees: &[AttendeeProfile]) -> EventBreakdown {
    let event_attendees: Vec<AttendeeProfile> = attendees
        .iter()
        .filter(|attendee| attendee.checked_into(&event.event_name))
        .cloned()
        .collect();
    let checked_in = event_attendees.len() as u64;
    // Without an event date there is nothing to classify against
    let returning = event
        .event_date
        .map(|date| returning::count_returning(&event_attendees, &date))
        .unwrap_or(0);

    let feedback = event_attendees
        .iter()
        .flat_map(|attendee| {
            attendee
                .feedback
                .iter()
                .filter(|entry| entry.event_name == event.event_name)
                .map(|entry| EventFeedback {
                    attendee_name: attendee.display_name.clone(),
                    rating: entry.rating,
                    response_text: entry.response_text.clone(),
                })
        })
        .collect();

    EventBreakdown {
        event_id: event.event_id.to_string(),
        event_name: event.event_name.clone(),
        event_date: event
            .event_date
            .as_ref()
            .map(backend_domain::utils::format_chart_date)
            .unwrap_or_default(),
        total_attendance: event.total_attendance,
        total_rsvps: event.total_rsvps,
        checked_in,
        returning,
        new_attendees: checked_in - returning,
        checkin_times: checkin_times::checkin_time_stats(&event_attendees),
        feedback,
    }
}

#[cfg(test)]
mod tests {
    use backend_domain::utils::parse_timestamp;
    use backend_domain::value_objects::{EventId, OwnerId};
    use backend_domain::FeedbackEntry;

    use super::*;

    fn event(name: &str, date: Option<&str>) -> EventMetadata {
        EventMetadata {
            event_id: EventId(format!("id-{}", name)),
            owner_id: OwnerId("owner".to_string()),
            event_name: name.to_string(),
            event_date: date.and_then(parse_timestamp),
            event_date_raw: date.unwrap_or_default().to_string(),
            total_attendance: 10,
            total_rsvps: 12,
            file_path: String::new(),
            created_at: None,
        }
    }

    fn attendee(name: &str, first_checkin: &str, total: u64, events: &[&str]) -> AttendeeProfile {
        AttendeeProfile {
            user_ref_id: name.to_string(),
            cleaned_email: format!("{}@example.com", name),
            display_name: name.to_string(),
            first_checkin: parse_timestamp(first_checkin),
            last_checkin: None,
            total_events_checked_in: total,
            approved_not_checked_in: 0,
            declined: 0,
            invited: 0,
            waitlisted: 0,
            checked_in_event_names: events.iter().map(|event| event.to_string()).collect(),
            feedback: vec![FeedbackEntry {
                event_name: events.first().unwrap_or(&"").to_string(),
                rating: 4,
                response_text: "good".to_string(),
            }],
            custom_fields_by_event: Default::default(),
            average_rating: None,
        }
    }

    #[test]
    fn breakdown_splits_returning_and_new_attendees() {
        let demo = event("Demo night", Some("2025-04-07 19:30:00+00"));
        let attendees = vec![
            // First check-in long before the event, multiple events: returning
            attendee("ada", "2024-11-01 19:00:00+00", 3, &["Demo night"]),
            // Single event ever: new, whatever the date says
            attendee("bob", "2024-11-01 19:00:00+00", 1, &["Demo night"]),
            // Never checked into this event at all
            attendee("eve", "2024-11-01 19:00:00+00", 5, &["Launch party"]),
        ];

        let breakdown = breakdown_for(&demo, &attendees);
        assert_eq!(breakdown.checked_in, 2);
        assert_eq!(breakdown.returning, 1);
        assert_eq!(breakdown.new_attendees, 1);
        assert_eq!(breakdown.feedback.len(), 2);
        assert_eq!(breakdown.event_date, "2025-04-07");
    }

    #[test]
    fn undated_events_report_zero_returning() {
        let mystery = event("Mystery", None);
        let attendees = vec![attendee("ada", "2024-11-01 19:00:00+00", 3, &["Mystery"])];
        let breakdown = breakdown_for(&mystery, &attendees);
        assert_eq!(breakdown.checked_in, 1);
        assert_eq!(breakdown.returning, 0);
        assert_eq!(breakdown.new_attendees, 1);
        assert_eq!(breakdown.event_date, "");
    }
}
