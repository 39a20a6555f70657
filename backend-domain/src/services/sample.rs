// Sample dashboard data
// Served when a range has no real events, so new wineries see a populated
// dashboard. Deterministic: the same winery and range always produce the
// same figures.

use chrono::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entities::{
    DailyStatRow, DashboardPayload, DashboardTotals, DeviceBreakdown, HourTotal, LanguageTotal,
    OsShare, RegionTotal, TrendSummary, WineRankRow,
};
use crate::services::aggregate::percent_change;
use crate::value_objects::DateRange;

const SAMPLE_WINES: &[&str] = &[
    "Ryzlink vlašský",
    "Pálava",
    "Frankovka",
    "Veltlínské zelené",
    "Rulandské šedé",
];

const SAMPLE_REGIONS: &[(&str, &str, &str)] = &[
    ("CZ", "Jihomoravský kraj", "Brno"),
    ("CZ", "Hlavní město Praha", "Praha"),
    ("SK", "Bratislavský kraj", "Bratislava"),
    ("DE", "Bayern", "München"),
    ("AT", "Wien", "Wien"),
];

const SAMPLE_LANGUAGES: &[&str] = &["cs", "en", "de", "sk"];

const SAMPLE_OS: &[(&str, u64)] = &[
    ("Android", 41),
    ("iOS", 34),
    ("Windows", 16),
    ("macOS", 6),
    ("Linux", 3),
];

fn seed_for(winery_id: &str, range: &DateRange) -> u64 {
    let mut seed: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in winery_id.bytes() {
        seed ^= u64::from(byte);
        seed = seed.wrapping_mul(0x0000_0100_0000_01b3);
    }
    seed ^ (range.days() as u64)
}

pub fn sample_dashboard(winery_id: &str, range: &DateRange) -> DashboardPayload {
    let mut rng = StdRng::seed_from_u64(seed_for(winery_id, range));

    let mut daily = Vec::new();
    let mut devices = DeviceBreakdown::default();
    let mut total_scans: u64 = 0;
    let mut unique_visitors: u64 = 0;

    let mut date = range.start;
    while date <= range.end {
        let scans = rng.gen_range(8..64u64);
        let mobile = scans * rng.gen_range(40..60u64) / 100;
        let tablet = scans * rng.gen_range(5..15u64) / 100;
        let desktop = scans - mobile - tablet - scans / 10;
        let uniques = (scans * rng.gen_range(60..90u64) / 100).max(1);

        devices.mobile += mobile;
        devices.tablet += tablet;
        devices.desktop += desktop;
        devices.unknown += scans - mobile - tablet - desktop;
        total_scans += scans;
        unique_visitors += uniques;

        daily.push(DailyStatRow {
            date: date.format("%Y-%m-%d").to_string(),
            scan_count: scans,
            unique_visitors: uniques,
            mobile,
            tablet,
            desktop,
        });
        date = date + Duration::days(1);
    }

    let top_wines = SAMPLE_WINES
        .iter()
        .enumerate()
        .map(|(idx, name)| WineRankRow {
            rank: idx as u32 + 1,
            wine_id: format!("sample-wine-{}", idx + 1),
            wine_name: (*name).to_string(),
            scan_count: total_scans / (idx as u64 + 2),
        })
        .collect();

    let top_regions = SAMPLE_REGIONS
        .iter()
        .enumerate()
        .map(|(idx, (country, region, city))| RegionTotal {
            country_code: (*country).to_string(),
            region_code: (*region).to_string(),
            city: (*city).to_string(),
            scan_count: total_scans / (idx as u64 + 2),
        })
        .collect();

    let top_languages = SAMPLE_LANGUAGES
        .iter()
        .enumerate()
        .map(|(idx, language)| LanguageTotal {
            language: (*language).to_string(),
            scan_count: total_scans / (idx as u64 + 2),
        })
        .collect();

    // Afternoon-weighted hour curve.
    let hourly = (0..24u8)
        .map(|hour| {
            let weight = match hour {
                10..=13 => 3,
                14..=20 => 4,
                7..=9 | 21..=22 => 2,
                _ => 1,
            };
            HourTotal {
                hour,
                scan_count: total_scans * weight / 60,
            }
        })
        .collect();

    let previous = total_scans * rng.gen_range(70..110u64) / 100;
    let (change, is_positive) = percent_change(total_scans, previous);

    DashboardPayload {
        winery_id: winery_id.to_string(),
        start_date: range.start_str(),
        end_date: range.end_str(),
        totals: DashboardTotals {
            total_scans,
            unique_visitors,
        },
        trend: TrendSummary {
            current: total_scans,
            previous,
            percent_change: change,
            is_positive,
        },
        devices,
        os_breakdown: SAMPLE_OS
            .iter()
            .map(|(os, percent)| OsShare {
                operating_system: (*os).to_string(),
                percent: *percent,
            })
            .collect(),
        top_wines,
        top_regions,
        top_languages,
        hourly,
        daily,
        is_sample_data: true,
    }
}
