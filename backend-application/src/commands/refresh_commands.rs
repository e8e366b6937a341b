use backend_domain::{AggregateMetrics, RefreshQuery};

use crate::queries::require_owner;
use crate::{AppError, AppState};

/// Forces a full re-fetch and returns the fresh metrics.
pub async fn refresh_analytics(
    state: &AppState,
    query: RefreshQuery,
) -> Result<AggregateMetrics, AppError> {
    let owner = require_owner(query.owner)?;
    let snapshot = state.store.refresh(&owner).await?;
    Ok(snapshot.metrics.clone())
}

/// Write-path signal (event uploaded, edited or deleted): marks the owner's
/// cached analytics stale. The next read re-fetches.
pub async fn invalidate_analytics(state: &AppState, query: RefreshQuery) -> Result<(), AppError> {
    let owner = require_owner(query.owner)?;
    state.store.invalidate(&owner).await;
    Ok(())
}
