// Read-side application services

pub mod attendee_queries;
pub mod event_queries;
pub mod metrics_queries;

use backend_domain::OwnerId;

use crate::AppError;

pub(crate) fn require_owner(owner: Option<String>) -> Result<OwnerId, AppError> {
    let owner = owner.map(|raw| raw.trim().to_string()).unwrap_or_default();
    if owner.is_empty() {
        return Err(AppError::BadRequest("owner is required".to_string()));
    }
    Ok(OwnerId(owner))
}
