use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::refresh_commands;
use backend_application::queries::{attendee_queries, event_queries, metrics_queries};
use backend_application::AppState;
use backend_domain::{
    AggregateMetrics, AttendeeListQuery, AttendeeProfile, CheckinTimeStats, EventBreakdown,
    EventListQuery, EventMetadata, OwnerQuery, RefreshQuery,
};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn dashboard_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<AggregateMetrics>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let metrics = metrics_queries::dashboard_summary(&state, query).await?;
    Ok(Json(metrics))
}

pub async fn checkin_times(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<CheckinTimeStats>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let stats = metrics_queries::checkin_times(&state, query).await?;
    Ok(Json(stats))
}

pub async fn list_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<EventMetadata>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let events = event_queries::list_events(&state, query).await?;
    Ok(Json(events))
}

pub async fn event_breakdowns(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<EventBreakdown>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let breakdowns = event_queries::event_breakdowns(&state, query).await?;
    Ok(Json(breakdowns))
}

pub async fn list_attendees(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AttendeeListQuery>,
) -> Result<Json<Vec<AttendeeProfile>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let attendees = attendee_queries::list_attendees(&state, query).await?;
    Ok(Json(attendees))
}

pub async fn refresh_analytics(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<AggregateMetrics>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let metrics = refresh_commands::refresh_analytics(&state, query).await?;
    Ok(Json(metrics))
}

pub async fn invalidate_analytics(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RefreshQuery>,
) -> Result<StatusCode, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    refresh_commands::invalidate_analytics(&state, query).await?;
    Ok(StatusCode::NO_CONTENT)
}
