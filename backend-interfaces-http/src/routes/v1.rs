use axum::Router;

use backend_application::AppState;

use crate::handlers::{analytics_handlers, ops_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/analytics/summary",
            axum::routing::get(analytics_handlers::dashboard_summary),
        )
        .route(
            "/v1/analytics/checkin-times",
            axum::routing::get(analytics_handlers::checkin_times),
        )
        .route(
            "/v1/analytics/events",
            axum::routing::get(analytics_handlers::list_events),
        )
        .route(
            "/v1/analytics/events/breakdown",
            axum::routing::get(analytics_handlers::event_breakdowns),
        )
        .route(
            "/v1/analytics/attendees",
            axum::routing::get(analytics_handlers::list_attendees),
        )
        .route(
            "/v1/analytics/refresh",
            axum::routing::post(analytics_handlers::refresh_analytics),
        )
        .route(
            "/v1/analytics/invalidate",
            axum::routing::post(analytics_handlers::invalidate_analytics),
        )
        .route(
            "/v1/ops/health/live",
            axum::routing::get(ops_handlers::health_live),
        )
        .route(
            "/v1/ops/health/ready",
            axum::routing::get(ops_handlers::health_ready),
        )
        .route(
            "/v1/ops/metrics/prometheus",
            axum::routing::get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
