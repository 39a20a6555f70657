use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::IntoResponse;

use backend_application::queries::export_queries;
use backend_application::AppState;
use backend_domain::ExportQuery;

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn export_analytics(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let output = export_queries::export_data(&state, query).await?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(output.content_type),
    );
    response_headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", output.filename))
            .map_err(|err| HttpError::Internal(err.to_string()))?,
    );
    Ok((response_headers, output.body))
}
