use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use backend_application::commands::wine_registry_commands;
use backend_application::queries::wine_registry_queries;
use backend_application::AppState;
use backend_domain::{WineRecordApi, WineRegistryPayload, WineRegistryQuery, WineRegistryUpdateQuery};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_wines(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WineRegistryQuery>,
) -> Result<Json<Vec<WineRecordApi>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let wines = wine_registry_queries::list_wine_registry(&state, query).await?;
    Ok(Json(wines))
}

pub async fn update_wines(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WineRegistryUpdateQuery>,
    Json(payload): Json<WineRegistryPayload>,
) -> Result<StatusCode, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    wine_registry_commands::update_wine_registry(&state, query, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}
