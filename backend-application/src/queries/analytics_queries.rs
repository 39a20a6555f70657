// Per-dimension aggregation queries
// Each query fetches the tenant's events for the range on its own and is
// therefore independently failable; the dashboard composer decides what a
// failure means.

use backend_domain::services::aggregate;
use backend_domain::utils::validate_record_id;
use backend_domain::{
    DailyStatRow, DateRange, HourRow, LanguageRow, RegionRow, ScanEventRow, WineRankRow,
};

use crate::{AppError, AppState};

pub const TOP_WINES_LIMIT: usize = 10;

pub fn validate_winery(winery_id: &str) -> Result<(), AppError> {
    validate_record_id("winery_id", winery_id).map_err(|err| AppError::BadRequest(err.to_string()))
}

pub async fn fetch_range_events(
    state: &AppState,
    winery_id: &str,
    range: &DateRange,
    limit: usize,
) -> Result<Vec<ScanEventRow>, AppError> {
    let events = state
        .scan_repo
        .fetch_events(winery_id, range.start, range.end, limit)
        .await
        .map_err(AppError::Internal)?;
    Ok(events)
}

pub async fn daily_stats(
    state: &AppState,
    winery_id: &str,
    range: &DateRange,
) -> Result<Vec<DailyStatRow>, AppError> {
    let events = fetch_range_events(state, winery_id, range, state.config.max_fetch_rows).await?;
    Ok(aggregate::daily_stats(&events))
}

pub async fn regional_stats(
    state: &AppState,
    winery_id: &str,
    range: &DateRange,
) -> Result<Vec<RegionRow>, AppError> {
    let events = fetch_range_events(state, winery_id, range, state.config.max_fetch_rows).await?;
    Ok(aggregate::regional_stats(&events))
}

pub async fn language_stats(
    state: &AppState,
    winery_id: &str,
    range: &DateRange,
) -> Result<Vec<LanguageRow>, AppError> {
    let events = fetch_range_events(state, winery_id, range, state.config.max_fetch_rows).await?;
    Ok(aggregate::language_stats(&events))
}

pub async fn hourly_stats(
    state: &AppState,
    winery_id: &str,
    range: &DateRange,
) -> Result<Vec<HourRow>, AppError> {
    let events = fetch_range_events(state, winery_id, range, state.config.max_fetch_rows).await?;
    Ok(aggregate::hourly_stats(&events))
}

pub async fn top_wines(
    state: &AppState,
    winery_id: &str,
    range: &DateRange,
    limit: usize,
) -> Result<Vec<WineRankRow>, AppError> {
    let events = fetch_range_events(state, winery_id, range, state.config.max_fetch_rows).await?;
    Ok(aggregate::top_wines(&events, limit))
}
