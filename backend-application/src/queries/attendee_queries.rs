use backend_domain::services::ranking;
use backend_domain::{AttendeeListQuery, AttendeeProfile, AttendeeSortField, SortDirection};

use crate::queries::require_owner;
use crate::{AppError, AppState};

pub async fn list_attendees(
    state: &AppState,
    query: AttendeeListQuery,
) -> Result<Vec<AttendeeProfile>, AppError> {
    let owner = require_owner(query.owner)?;
    let snapshot = state.store.fetch(&owner, false).await?;
    let field = query.field.unwrap_or(AttendeeSortField::Name);
    let direction = query.direction.unwrap_or(SortDirection::Desc);
    Ok(ranking::sort_by(&snapshot.attendees, field, direction))
}
