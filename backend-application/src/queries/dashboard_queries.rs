// Dashboard composer
// Two terminal outcomes per request: real data, or deterministic sample
// data when the anchor (daily) query finds nothing in the range. Every
// non-anchor dimension degrades to empty on failure instead of aborting
// the response.

use chrono::Utc;
use tracing::warn;

use backend_domain::services::{aggregate, sample_dashboard};
use backend_domain::{
    DashboardPayload, DashboardQuery, DashboardTotals, DeviceBreakdown, RangePreset, TrendSummary,
};

use crate::queries::analytics_queries::{self, TOP_WINES_LIMIT};
use crate::{AppError, AppState};

const OS_SCAN_LIMIT: usize = 1000;
const TOP_REGIONS_LIMIT: usize = 10;
const TOP_LANGUAGES_LIMIT: usize = 10;

pub async fn compose_dashboard(
    state: &AppState,
    query: DashboardQuery,
) -> Result<DashboardPayload, AppError> {
    analytics_queries::validate_winery(&query.winery_id)?;
    let preset = RangePreset::parse(query.range.as_deref().unwrap_or("30days"))
        .map_err(|err| AppError::BadRequest(err.to_string()))?;
    let range = preset.to_range(Utc::now().date_naive());
    state.metrics.record_dashboard();

    // Anchor query. Its failure is the only fatal one.
    let daily = analytics_queries::daily_stats(state, &query.winery_id, &range).await?;
    if daily.is_empty() {
        return Ok(sample_dashboard(&query.winery_id, &range));
    }

    let regional = analytics_queries::regional_stats(state, &query.winery_id, &range)
        .await
        .unwrap_or_else(|err| {
            warn!("regional stats degraded: {}", err);
            Vec::new()
        });
    let languages = analytics_queries::language_stats(state, &query.winery_id, &range)
        .await
        .unwrap_or_else(|err| {
            warn!("language stats degraded: {}", err);
            Vec::new()
        });
    let hourly = analytics_queries::hourly_stats(state, &query.winery_id, &range)
        .await
        .unwrap_or_else(|err| {
            warn!("hourly stats degraded: {}", err);
            Vec::new()
        });
    let top_wines = analytics_queries::top_wines(state, &query.winery_id, &range, TOP_WINES_LIMIT)
        .await
        .unwrap_or_else(|err| {
            warn!("wine ranking degraded: {}", err);
            Vec::new()
        });

    // OS shares come from a bounded re-scan of raw events; if even that
    // fails the section still renders as a single Unknown bucket.
    let os_breakdown =
        match analytics_queries::fetch_range_events(state, &query.winery_id, &range, OS_SCAN_LIMIT)
            .await
        {
            Ok(events) => aggregate::os_breakdown(&events),
            Err(err) => {
                warn!("os breakdown degraded: {}", err);
                aggregate::os_breakdown_fallback()
            }
        };

    let total_scans: u64 = daily.iter().map(|day| day.scan_count).sum();
    let unique_visitors: u64 = daily.iter().map(|day| day.unique_visitors).sum();
    let devices = daily.iter().fold(DeviceBreakdown::default(), |mut acc, day| {
        acc.mobile += day.mobile;
        acc.tablet += day.tablet;
        acc.desktop += day.desktop;
        acc.unknown += day.scan_count - day.mobile - day.tablet - day.desktop;
        acc
    });

    let previous_range = range.previous();
    let previous = state
        .scan_repo
        .count_events(&query.winery_id, previous_range.start, previous_range.end)
        .await
        .unwrap_or_else(|err| {
            warn!("previous period count degraded: {}", err);
            0
        });
    let (percent_change, is_positive) = aggregate::percent_change(total_scans, previous);

    Ok(DashboardPayload {
        winery_id: query.winery_id,
        start_date: range.start_str(),
        end_date: range.end_str(),
        totals: DashboardTotals {
            total_scans,
            unique_visitors,
        },
        trend: TrendSummary {
            current: total_scans,
            previous,
            percent_change,
            is_positive,
        },
        devices,
        os_breakdown,
        top_wines,
        top_regions: aggregate::rollup_regions(&regional, TOP_REGIONS_LIMIT),
        top_languages: aggregate::rollup_languages(&languages, TOP_LANGUAGES_LIMIT),
        hourly: aggregate::rollup_hours(&hourly),
        daily,
        is_sample_data: false,
    })
}
