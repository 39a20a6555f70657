use axum::Router;

use backend_application::AppState;

use crate::handlers::{
    analytics_handlers, export_handlers, ops_handlers, registry_handlers, scan_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/scan-events",
            axum::routing::post(scan_handlers::record_scan),
        )
        .route(
            "/v1/analytics/dashboard",
            axum::routing::get(analytics_handlers::get_dashboard),
        )
        .route(
            "/v1/analytics/export",
            axum::routing::get(export_handlers::export_analytics),
        )
        .route(
            "/v1/wines",
            axum::routing::get(registry_handlers::list_wines).put(registry_handlers::update_wines),
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
