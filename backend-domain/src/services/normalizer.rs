// Normalization boundary
// Coerces loose source rows into strict entities. Downstream logic relies on
// this being the only place that re-validates shapes.

use std::collections::HashMap;

use serde_json::Value;
use tracing::warn;

use crate::entities::{
    AttendeeProfile, EventMetadata, FeedbackEntry, RawAttendeeRow, RawEventRow,
};
use crate::error::DataShapeError;
use crate::utils::parse_timestamp;
use crate::value_objects::{EventId, OwnerId};

/// One bad row must not drop the whole result set: malformed rows are logged
/// and skipped, everything else passes through in input order.
pub fn normalize_events(rows: Vec<RawEventRow>) -> Vec<EventMetadata> {
    let mut events = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match normalize_event(row) {
            Ok(event) => events.push(event),
            Err(reason) => {
                warn!("skipping event row: {}", DataShapeError { index, reason });
            }
        }
    }
    events
}

pub fn normalize_attendees(rows: Vec<RawAttendeeRow>) -> Vec<AttendeeProfile> {
    let mut attendees = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match normalize_attendee(row) {
            Ok(attendee) => attendees.push(attendee),
            Err(reason) => {
                warn!("skipping attendee row: {}", DataShapeError { index, reason });
            }
        }
    }
    attendees
}

fn normalize_event(row: RawEventRow) -> Result<EventMetadata, String> {
    let event_id = trimmed(row.eventid.as_deref())
        .or_else(|| identity_text(&row.id))
        .ok_or_else(|| "missing event id".to_string())?;

    let event_date_raw = row.eventdate.unwrap_or_default();
    Ok(EventMetadata {
        event_id: EventId(event_id),
        owner_id: OwnerId(trimmed(row.userid.as_deref()).unwrap_or_default()),
        event_name: row.eventname.unwrap_or_default(),
        event_date: parse_timestamp(&event_date_raw),
        event_date_raw,
        total_attendance: count_field(&row.totalattendance),
        total_rsvps: count_field(&row.totalrsvps),
        file_path: row.filepath.unwrap_or_default(),
        created_at: row.created_at.as_deref().and_then(parse_timestamp),
    })
}

fn normalize_attendee(row: RawAttendeeRow) -> Result<AttendeeProfile, String> {
    let email = trimmed(row.cleaned_email.as_deref());
    let userid = trimmed(row.userid.as_deref());
    if email.is_none() && userid.is_none() {
        return Err("missing attendee identity (no email or user ref)".to_string());
    }
    let cleaned_email = email.clone().unwrap_or_default();
    let user_ref_id = userid.unwrap_or_else(|| cleaned_email.clone());

    let display_name = display_name(
        row.name.as_deref(),
        row.first_name_guess.as_deref(),
        row.last_name_guess.as_deref(),
        &cleaned_email,
    );

    let feedback = row
        .all_feedback_structured
        .unwrap_or_default()
        .into_iter()
        .map(|entry| FeedbackEntry {
            event_name: entry.eventname.unwrap_or_default(),
            rating: count_field(&entry.rating).min(5) as u8,
            response_text: entry.response.unwrap_or_default(),
        })
        .collect();

    Ok(AttendeeProfile {
        user_ref_id,
        cleaned_email,
        display_name,
        first_checkin: row.first_checkin_date.as_deref().and_then(parse_timestamp),
        last_checkin: row.last_checkin_date.as_deref().and_then(parse_timestamp),
        total_events_checked_in: count_field(&row.total_events_checked_in),
        approved_not_checked_in: count_field(&row.count_events_approved_not_checked_in),
        declined: count_field(&row.count_events_declined),
        invited: count_field(&row.count_events_invited),
        waitlisted: count_field(&row.count_events_waitlisted),
        checked_in_event_names: row.checked_in_event_names_array.unwrap_or_default(),
        feedback,
        custom_fields_by_event: custom_fields(row.all_custom_data),
        average_rating: float_field(&row.average_rating),
    })
}

/// Best-effort display name, in the order the original data offers it:
/// explicit name, guessed first+last, email, "Anonymous".
fn display_name(
    name: Option<&str>,
    first_guess: Option<&str>,
    last_guess: Option<&str>,
    email: &str,
) -> String {
    if let Some(name) = trimmed(name) {
        return name;
    }
    let guessed = format!(
        "{} {}",
        first_guess.unwrap_or_default().trim(),
        last_guess.unwrap_or_default().trim()
    );
    let guessed = guessed.trim();
    if !guessed.is_empty() {
        return guessed.to_string();
    }
    if !email.is_empty() {
        return email.to_string();
    }
    "Anonymous".to_string()
}

fn trimmed(value: Option<&str>) -> Option<String> {
    let text = value?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Identity columns arrive as JSON numbers or strings depending on the
/// export generation.
fn identity_text(value: &Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    }
}

/// Counts arrive as JSON numbers or decimal strings ("3", "3.0"); missing or
/// negative values collapse to 0, fractions truncate.
fn count_field(value: &Option<Value>) -> u64 {
    match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|v| *v >= 0.0).map(|v| v.trunc() as u64))
            .unwrap_or(0),
        Some(Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| *v >= 0.0)
            .map(|v| v.trunc() as u64)
            .unwrap_or(0),
        _ => 0,
    }
}

fn float_field(value: &Option<Value>) -> Option<f64> {
    match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn custom_fields(value: Option<Value>) -> HashMap<String, HashMap<String, String>> {
    let Some(Value::Object(by_event)) = value else {
        return HashMap::new();
    };
    let mut result = HashMap::new();
    for (event_key, fields) in by_event {
        let Value::Object(fields) = fields else {
            continue;
        };
        let entry = fields
            .into_iter()
            .map(|(key, field_value)| (key, field_text(&field_value)))
            .collect();
        result.insert(event_key, entry);
    }
    result
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
