// Display ranking
// Generic multi-field, direction-aware comparator for events and attendees

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::entities::{AttendeeProfile, EventMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// The comparable value a field projects out of an item.
#[derive(Debug, Clone)]
pub enum SortValue {
    Text(String),
    /// `None` is an unknown date; unknowns sort after every known date in
    /// BOTH directions. That is a display policy, not ordinary ordering, and
    /// is handled explicitly rather than falling out of NaN comparisons.
    Date(Option<DateTime<FixedOffset>>),
    Number(f64),
}

pub trait Sortable {
    type Field: Copy;

    fn sort_value(&self, field: Self::Field) -> SortValue;
}

/// Stable sort into a new vector; the input order is untouched and ties keep
/// their original relative order.
pub fn sort_by<T>(items: &[T], field: T::Field, direction: SortDirection) -> Vec<T>
where
    T: Sortable + Clone,
{
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| compare(&a.sort_value(field), &b.sort_value(field), direction));
    sorted
}

fn compare(a: &SortValue, b: &SortValue, direction: SortDirection) -> Ordering {
    match (a, b) {
        (SortValue::Text(a), SortValue::Text(b)) => {
            directed(fold_text(a).cmp(&fold_text(b)), direction)
        }
        (SortValue::Date(a), SortValue::Date(b)) => compare_dates(*a, *b, direction),
        (SortValue::Number(a), SortValue::Number(b)) => directed(a.total_cmp(b), direction),
        // A single field always projects a single kind
        _ => Ordering::Equal,
    }
}

fn compare_dates(
    a: Option<DateTime<FixedOffset>>,
    b: Option<DateTime<FixedOffset>>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => directed(a.cmp(&b), direction),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Case-insensitive Unicode folding stands in for locale collation; see
/// DESIGN.md.
fn fold_text(text: &str) -> String {
    text.to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSortField {
    EventDate,
    EventName,
    CheckIns,
    Rsvps,
    CheckInRatio,
    CreatedAt,
}

impl Sortable for EventMetadata {
    type Field = EventSortField;

    fn sort_value(&self, field: EventSortField) -> SortValue {
        match field {
            EventSortField::EventDate => SortValue::Date(self.event_date),
            EventSortField::EventName => SortValue::Text(self.event_name.clone()),
            EventSortField::CheckIns => SortValue::Number(self.total_attendance as f64),
            EventSortField::Rsvps => SortValue::Number(self.total_rsvps as f64),
            EventSortField::CheckInRatio => SortValue::Number(self.checkin_ratio()),
            EventSortField::CreatedAt => SortValue::Date(self.created_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendeeSortField {
    Name,
    Email,
    EventsCheckedIn,
    EventsApproved,
    FirstCheckin,
    AverageRating,
}

impl Sortable for AttendeeProfile {
    type Field = AttendeeSortField;

    fn sort_value(&self, field: AttendeeSortField) -> SortValue {
        match field {
            AttendeeSortField::Name => SortValue::Text(self.display_name.clone()),
            AttendeeSortField::Email => SortValue::Text(self.cleaned_email.clone()),
            AttendeeSortField::EventsCheckedIn => {
                SortValue::Number(self.total_events_checked_in as f64)
            }
            AttendeeSortField::EventsApproved => {
                SortValue::Number(self.approved_not_checked_in as f64)
            }
            AttendeeSortField::FirstCheckin => SortValue::Date(self.first_checkin),
            // Missing ratings compare as 0
            AttendeeSortField::AverageRating => {
                SortValue::Number(self.average_rating.unwrap_or(0.0))
            }
        }
    }
}

/// Column-header toggle state: clicking the active field flips the
/// direction; clicking a different field selects it and resets to
/// descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: Copy + PartialEq> SortState<F> {
    pub fn initial(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }

    pub fn toggle(&mut self, clicked: F) {
        if self.field == clicked {
            self.direction = self.direction.flipped();
        } else {
            self.field = clicked;
            self.direction = SortDirection::Desc;
        }
    }
}

impl Default for SortState<EventSortField> {
    fn default() -> Self {
        Self::initial(EventSortField::EventDate)
    }
}

impl Default for SortState<AttendeeSortField> {
    fn default() -> Self {
        Self::initial(AttendeeSortField::Name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_timestamp;
    use crate::value_objects::{EventId, OwnerId};

    fn event(name: &str, date: Option<&str>, attendance: u64, rsvps: u64) -> EventMetadata {
        EventMetadata {
            event_id: EventId(name.to_string()),
            owner_id: OwnerId("owner".to_string()),
            event_name: name.to_string(),
            event_date: date.and_then(parse_timestamp),
            event_date_raw: date.unwrap_or_default().to_string(),
            total_attendance: attendance,
            total_rsvps: rsvps,
            file_path: String::new(),
            created_at: None,
        }
    }

    fn names(events: &[EventMetadata]) -> Vec<&str> {
        events.iter().map(|event| event.event_name.as_str()).collect()
    }

    #[test]
    fn unknown_dates_sort_last_in_both_directions() {
        let events = vec![
            event("mystery", None, 1, 1),
            event("march", Some("2025-03-01"), 1, 1),
            event("april", Some("2025-04-01"), 1, 1),
        ];
        let ascending = sort_by(&events, EventSortField::EventDate, SortDirection::Asc);
        assert_eq!(names(&ascending), ["march", "april", "mystery"]);
        let descending = sort_by(&events, EventSortField::EventDate, SortDirection::Desc);
        assert_eq!(names(&descending), ["april", "march", "mystery"]);
    }

    #[test]
    fn sort_is_stable_and_leaves_input_untouched() {
        let events = vec![
            event("b-first", Some("2025-03-01"), 7, 10),
            event("a-second", Some("2025-03-01"), 7, 10),
            event("c-third", Some("2025-03-01"), 7, 10),
        ];
        let ascending = sort_by(&events, EventSortField::EventDate, SortDirection::Asc);
        let back = sort_by(&ascending, EventSortField::EventDate, SortDirection::Desc);
        // All tie on the date: both passes must preserve original relative order
        assert_eq!(names(&back), ["b-first", "a-second", "c-third"]);
        assert_eq!(names(&events), ["b-first", "a-second", "c-third"]);
    }

    #[test]
    fn ratio_sort_safe_divides_zero_rsvps() {
        let events = vec![
            event("no-rsvps", Some("2025-03-01"), 50, 0),
            event("half", Some("2025-03-02"), 5, 10),
            event("overfull", Some("2025-03-03"), 15, 10),
        ];
        let by_ratio = sort_by(&events, EventSortField::CheckInRatio, SortDirection::Desc);
        assert_eq!(names(&by_ratio), ["overfull", "half", "no-rsvps"]);
    }

    #[test]
    fn text_sort_folds_case() {
        let events = vec![
            event("beta", Some("2025-03-01"), 0, 0),
            event("Alpha", Some("2025-03-01"), 0, 0),
        ];
        let by_name = sort_by(&events, EventSortField::EventName, SortDirection::Asc);
        assert_eq!(names(&by_name), ["Alpha", "beta"]);
    }

    #[test]
    fn toggle_flips_active_field_and_resets_new_field() {
        let mut state = SortState::<EventSortField>::default();
        assert_eq!(state.field, EventSortField::EventDate);
        assert_eq!(state.direction, SortDirection::Desc);

        state.toggle(EventSortField::EventDate);
        assert_eq!(state.direction, SortDirection::Asc);
        state.toggle(EventSortField::EventDate);
        assert_eq!(state.direction, SortDirection::Desc);

        state.toggle(EventSortField::CheckIns);
        assert_eq!(state.field, EventSortField::CheckIns);
        assert_eq!(state.direction, SortDirection::Desc);
    }
}
