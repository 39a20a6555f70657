// Aggregate rows and dashboard payload
// All aggregates are computed on read from raw scan events; none are persisted.

use serde::{Deserialize, Serialize};

/// Per-day totals with device sub-counts. Sub-counts never exceed
/// `scan_count`; unclassified devices absorb the remainder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStatRow {
    pub date: String,
    pub scan_count: u64,
    pub unique_visitors: u64,
    pub mobile: u64,
    pub tablet: u64,
    pub desktop: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionRow {
    pub date: String,
    pub country_code: String,
    pub region_code: String,
    pub city: String,
    pub scan_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageRow {
    pub date: String,
    pub language: String,
    pub scan_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourRow {
    pub date: String,
    pub hour: u8,
    pub scan_count: u64,
}

/// Ranked wine popularity across a range. Ranks start at 1 and are assigned
/// in stable first-seen order; equal counts get successive ranks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WineRankRow {
    pub rank: u32,
    pub wine_id: String,
    pub wine_name: String,
    pub scan_count: u64,
}

/// Range-wide roll-ups used by the dashboard (the per-date rows above feed
/// the export surface).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionTotal {
    pub country_code: String,
    pub region_code: String,
    pub city: String,
    pub scan_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageTotal {
    pub language: String,
    pub scan_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourTotal {
    pub hour: u8,
    pub scan_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsShare {
    pub operating_system: String,
    pub percent: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardTotals {
    pub total_scans: u64,
    /// Sum of per-day distinct masked IPs; an estimate by construction.
    pub unique_visitors: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendSummary {
    pub current: u64,
    pub previous: u64,
    pub percent_change: i64,
    pub is_positive: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceBreakdown {
    pub mobile: u64,
    pub tablet: u64,
    pub desktop: u64,
    pub unknown: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardPayload {
    pub winery_id: String,
    pub start_date: String,
    pub end_date: String,
    pub totals: DashboardTotals,
    pub trend: TrendSummary,
    pub devices: DeviceBreakdown,
    pub os_breakdown: Vec<OsShare>,
    pub top_wines: Vec<WineRankRow>,
    pub top_regions: Vec<RegionTotal>,
    pub top_languages: Vec<LanguageTotal>,
    pub hourly: Vec<HourTotal>,
    pub daily: Vec<DailyStatRow>,
    pub is_sample_data: bool,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub winery_id: String,
    pub range: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub winery_id: String,
    #[serde(rename = "type")]
    pub export_type: String,
    pub format: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
