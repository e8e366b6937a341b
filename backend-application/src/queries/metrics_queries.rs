use backend_domain::services::checkin_times;
use backend_domain::{AggregateMetrics, CheckinTimeStats, OwnerQuery};

use crate::queries::require_owner;
use crate::{AppError, AppState};

pub async fn dashboard_summary(
    state: &AppState,
    query: OwnerQuery,
) -> Result<AggregateMetrics, AppError> {
    let owner = require_owner(query.owner)?;
    let snapshot = state.store.fetch(&owner, false).await?;
    Ok(snapshot.metrics.clone())
}

pub async fn checkin_times(
    state: &AppState,
    query: OwnerQuery,
) -> Result<CheckinTimeStats, AppError> {
    let owner = require_owner(query.owner)?;
    let snapshot = state.store.fetch(&owner, false).await?;
    Ok(checkin_times::checkin_time_stats(&snapshot.attendees))
}
