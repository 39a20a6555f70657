use time::OffsetDateTime;

use backend_domain::utils::validate_record_id;
use backend_domain::{WineRecordApi, WineRegistryPayload, WineRegistryUpdateQuery, WineRow};

use crate::{AppError, AppState};

pub async fn update_wine_registry(
    state: &AppState,
    query: WineRegistryUpdateQuery,
    payload: WineRegistryPayload,
) -> Result<(), AppError> {
    validate_record_id("winery_id", &query.winery_id)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    let now = OffsetDateTime::now_utc();
    let mut rows = Vec::with_capacity(payload.wines.len());
    for wine in &payload.wines {
        let wine = wine.normalized();
        validate_record_id("wine_id", &wine.wine_id)
            .map_err(|err| AppError::BadRequest(err.to_string()))?;
        if wine.name.is_empty() {
            return Err(AppError::BadRequest(format!(
                "wine '{}' has no name",
                wine.wine_id
            )));
        }
        rows.push(to_row(&wine, &query.winery_id, now));
    }

    let mode = query.mode.as_deref().unwrap_or("merge").trim().to_lowercase();
    if mode == "replace" {
        state
            .wine_repo
            .replace_wines(&query.winery_id, &rows)
            .await
            .map_err(AppError::Internal)?;
    } else {
        state
            .wine_repo
            .insert_wines(&rows)
            .await
            .map_err(AppError::Internal)?;
    }
    Ok(())
}

fn to_row(wine: &WineRecordApi, winery_id: &str, created_at: OffsetDateTime) -> WineRow {
    WineRow {
        created_at,
        wine_id: wine.wine_id.clone(),
        winery_id: winery_id.to_string(),
        name: wine.name.clone(),
        batch: wine.batch.clone(),
        vintage: wine.vintage.clone(),
        grape: wine.grape.clone(),
        alcohol_percent: wine.alcohol_percent.clone(),
    }
}
