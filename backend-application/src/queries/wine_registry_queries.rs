use tracing::error;

use backend_domain::utils::validate_record_id;
use backend_domain::{WineRecordApi, WineRegistryQuery};

use crate::{AppError, AppState};

pub async fn list_wine_registry(
    state: &AppState,
    query: WineRegistryQuery,
) -> Result<Vec<WineRecordApi>, AppError> {
    validate_record_id("winery_id", &query.winery_id)
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    let rows = state
        .wine_repo
        .list_wines(&query.winery_id)
        .await
        .map_err(|err| {
            error!("failed to list wines: {}", err);
            AppError::Internal(err)
        })?;

    let mut list: Vec<WineRecordApi> = rows.iter().map(WineRecordApi::from).collect();
    list.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(list)
}
