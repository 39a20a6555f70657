use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use tracing::warn;

use backend_application::commands::scan_commands;
use backend_application::AppState;
use backend_domain::{ScanAck, ScanPayload};

use crate::middleware::client_metadata;

/// Anonymous write path. Always answers 200: the scanner is a label
/// consumer who must never see a broken page, so the `success` flag in the
/// body is the only failure signal. The body is decoded by hand for the
/// same reason — a malformed payload must not turn into a 4xx.
pub async fn record_scan(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Json<ScanAck> {
    let payload: ScanPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("unreadable scan payload: {}", err);
            return Json(ScanAck::rejected("invalid request body"));
        }
    };

    let ctx = client_metadata(&headers);
    let ack = scan_commands::record_scan(&state, payload, ctx).await;
    Json(ack)
}
