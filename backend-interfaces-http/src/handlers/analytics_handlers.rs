use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::queries::dashboard_queries;
use backend_application::AppState;
use backend_domain::{DashboardPayload, DashboardQuery};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardPayload>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let payload = dashboard_queries::compose_dashboard(&state, query).await?;
    Ok(Json(payload))
}
