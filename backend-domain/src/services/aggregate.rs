// Read-side aggregation
// Pure folds over fetched scan events; nothing here touches a repository.

use std::collections::{BTreeMap, HashMap, HashSet};

use time::OffsetDateTime;

use crate::entities::{
    DailyStatRow, HourRow, HourTotal, LanguageRow, LanguageTotal, OsShare, RegionRow, RegionTotal,
    ScanEventRow, WineRankRow,
};
use crate::value_objects::DeviceType;

pub fn event_date(timestamp: &OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        timestamp.year(),
        timestamp.month() as u8,
        timestamp.day()
    )
}

/// Per-day totals with a distinct-masked-IP visitor estimate and device
/// sub-counts. UNKNOWN devices count toward the total only, so the
/// sub-count sum never exceeds `scan_count`.
pub fn daily_stats(events: &[ScanEventRow]) -> Vec<DailyStatRow> {
    #[derive(Default)]
    struct DayAcc {
        scans: u64,
        visitors: HashSet<String>,
        mobile: u64,
        tablet: u64,
        desktop: u64,
    }

    let mut days: BTreeMap<String, DayAcc> = BTreeMap::new();
    for event in events {
        let acc = days.entry(event_date(&event.timestamp)).or_default();
        acc.scans += 1;
        acc.visitors.insert(event.ip_address.clone());
        match DeviceType::from(event.device_type.as_str()) {
            DeviceType::MOBILE => acc.mobile += 1,
            DeviceType::TABLET => acc.tablet += 1,
            DeviceType::DESKTOP => acc.desktop += 1,
            DeviceType::UNKNOWN => {}
        }
    }

    days.into_iter()
        .map(|(date, acc)| DailyStatRow {
            date,
            scan_count: acc.scans,
            unique_visitors: acc.visitors.len() as u64,
            mobile: acc.mobile,
            tablet: acc.tablet,
            desktop: acc.desktop,
        })
        .collect()
}

pub fn regional_stats(events: &[ScanEventRow]) -> Vec<RegionRow> {
    let mut counts: BTreeMap<(String, String, String, String), u64> = BTreeMap::new();
    for event in events {
        let key = (
            event_date(&event.timestamp),
            event.country_code.clone(),
            event.region_code.clone(),
            event.city.clone(),
        );
        *counts.entry(key).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((date, country_code, region_code, city), scan_count)| RegionRow {
            date,
            country_code,
            region_code,
            city,
            scan_count,
        })
        .collect()
}

pub fn language_stats(events: &[ScanEventRow]) -> Vec<LanguageRow> {
    let mut counts: BTreeMap<(String, String), u64> = BTreeMap::new();
    for event in events {
        let key = (event_date(&event.timestamp), event.language_used.clone());
        *counts.entry(key).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((date, language), scan_count)| LanguageRow {
            date,
            language,
            scan_count,
        })
        .collect()
}

pub fn hourly_stats(events: &[ScanEventRow]) -> Vec<HourRow> {
    let mut counts: BTreeMap<(String, u8), u64> = BTreeMap::new();
    for event in events {
        let key = (event_date(&event.timestamp), event.timestamp.hour());
        *counts.entry(key).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((date, hour), scan_count)| HourRow {
            date,
            hour,
            scan_count,
        })
        .collect()
}

/// Wine popularity over the range. Accumulation order is first-seen, the
/// sort is stable, and ranks are assigned 1..n — so equal counts keep
/// their encounter order and receive successive ranks.
pub fn top_wines(events: &[ScanEventRow], limit: usize) -> Vec<WineRankRow> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, (String, u64)> = HashMap::new();
    for event in events {
        match counts.get_mut(&event.wine_id) {
            Some((_, count)) => *count += 1,
            None => {
                order.push(event.wine_id.clone());
                counts.insert(event.wine_id.clone(), (event.wine_name.clone(), 1));
            }
        }
    }

    let mut rows: Vec<(String, String, u64)> = order
        .into_iter()
        .map(|wine_id| {
            let (name, count) = counts
                .remove(&wine_id)
                .unwrap_or((String::new(), 0));
            (wine_id, name, count)
        })
        .collect();
    rows.sort_by(|a, b| b.2.cmp(&a.2));

    rows.into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, (wine_id, wine_name, scan_count))| WineRankRow {
            rank: idx as u32 + 1,
            wine_id,
            wine_name,
            scan_count,
        })
        .collect()
}

pub fn rollup_regions(rows: &[RegionRow], limit: usize) -> Vec<RegionTotal> {
    let mut order: Vec<(String, String, String)> = Vec::new();
    let mut counts: HashMap<(String, String, String), u64> = HashMap::new();
    for row in rows {
        let key = (
            row.country_code.clone(),
            row.region_code.clone(),
            row.city.clone(),
        );
        match counts.get_mut(&key) {
            Some(count) => *count += row.scan_count,
            None => {
                counts.insert(key.clone(), row.scan_count);
                order.push(key);
            }
        }
    }
    let mut totals: Vec<RegionTotal> = order
        .into_iter()
        .map(|key| {
            let scan_count = counts.remove(&key).unwrap_or(0);
            RegionTotal {
                country_code: key.0,
                region_code: key.1,
                city: key.2,
                scan_count,
            }
        })
        .collect();
    totals.sort_by(|a, b| b.scan_count.cmp(&a.scan_count));
    totals.truncate(limit);
    totals
}

pub fn rollup_languages(rows: &[LanguageRow], limit: usize) -> Vec<LanguageTotal> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();
    for row in rows {
        match counts.get_mut(&row.language) {
            Some(count) => *count += row.scan_count,
            None => {
                counts.insert(row.language.clone(), row.scan_count);
                order.push(row.language.clone());
            }
        }
    }
    let mut totals: Vec<LanguageTotal> = order
        .into_iter()
        .map(|language| {
            let scan_count = counts.remove(&language).unwrap_or(0);
            LanguageTotal {
                language,
                scan_count,
            }
        })
        .collect();
    totals.sort_by(|a, b| b.scan_count.cmp(&a.scan_count));
    totals.truncate(limit);
    totals
}

pub fn rollup_hours(rows: &[HourRow]) -> Vec<HourTotal> {
    let mut counts: BTreeMap<u8, u64> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.hour).or_default() += row.scan_count;
    }
    counts
        .into_iter()
        .map(|(hour, scan_count)| HourTotal { hour, scan_count })
        .collect()
}

const OS_BREAKDOWN_LIMIT: usize = 5;

/// Share of scans per operating system, rounded percent, top five.
/// Unclassified agents land in "Unknown".
pub fn os_breakdown(events: &[ScanEventRow]) -> Vec<OsShare> {
    if events.is_empty() {
        return Vec::new();
    }
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();
    for event in events {
        let os = if event.operating_system.is_empty() {
            "Unknown".to_string()
        } else {
            event.operating_system.clone()
        };
        match counts.get_mut(&os) {
            Some(count) => *count += 1,
            None => {
                counts.insert(os.clone(), 1);
                order.push(os);
            }
        }
    }
    let total = events.len() as u64;
    let mut shares: Vec<OsShare> = order
        .into_iter()
        .map(|os| {
            let count = counts.remove(&os).unwrap_or(0);
            OsShare {
                operating_system: os,
                percent: ((count as f64 / total as f64) * 100.0).round() as u64,
            }
        })
        .collect();
    shares.sort_by(|a, b| b.percent.cmp(&a.percent));
    shares.truncate(OS_BREAKDOWN_LIMIT);
    shares
}

/// The fallback bucket when the OS re-scan itself fails.
pub fn os_breakdown_fallback() -> Vec<OsShare> {
    vec![OsShare {
        operating_system: "Unknown".to_string(),
        percent: 100,
    }]
}

/// Rounded percent change against the previous period. A zero previous
/// period yields 0 regardless of the current value, and zero change is
/// not positive.
pub fn percent_change(current: u64, previous: u64) -> (i64, bool) {
    if previous == 0 {
        return (0, false);
    }
    let change = ((current as f64 - previous as f64) / previous as f64) * 100.0;
    let rounded = change.round() as i64;
    (rounded, rounded > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::millis_to_utc;

    const DAY_MS: i64 = 86_400_000;

    fn event(day: i64, hour: i64, wine: &str, device: &str) -> ScanEventRow {
        ScanEventRow {
            timestamp: millis_to_utc(day * DAY_MS + hour * 3_600_000),
            event_id: format!("e-{}-{}-{}", day, hour, wine),
            winery_id: "w1".to_string(),
            winery_name: "Vinařství Test".to_string(),
            winery_slug: "vinarstvi-test".to_string(),
            wine_id: wine.to_string(),
            wine_name: format!("Wine {}", wine),
            wine_batch: String::new(),
            wine_vintage: "2023".to_string(),
            ip_address: format!("203.{}.*.*", hour),
            device_type: device.to_string(),
            operating_system: "Android".to_string(),
            browser_language: "cs-cz".to_string(),
            country_code: "CZ".to_string(),
            region_code: "Jihomoravský kraj".to_string(),
            city: "Brno".to_string(),
            language_used: "cs".to_string(),
            referrer: String::new(),
        }
    }

    #[test]
    fn daily_counts_match_raw_events() {
        let events = vec![
            event(0, 1, "a", "MOBILE"),
            event(0, 2, "a", "DESKTOP"),
            event(0, 2, "b", "UNKNOWN"),
            event(1, 5, "a", "TABLET"),
        ];
        let rows = daily_stats(&events);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "1970-01-01");
        assert_eq!(rows[0].scan_count, 3);
        assert_eq!(rows[0].unique_visitors, 2);
        assert_eq!(rows[1].scan_count, 1);
    }

    #[test]
    fn device_subcounts_never_exceed_daily_total() {
        let events = vec![
            event(0, 1, "a", "MOBILE"),
            event(0, 2, "a", "UNKNOWN"),
            event(0, 3, "a", "gibberish"),
        ];
        let rows = daily_stats(&events);
        let row = &rows[0];
        assert!(row.mobile + row.tablet + row.desktop <= row.scan_count);
        assert_eq!(row.mobile, 1);
    }

    #[test]
    fn top_wines_ranking_is_stable() {
        // A and B tie at 5, C trails at 3; A was seen first.
        let mut events = Vec::new();
        for _ in 0..5 {
            events.push(event(0, 1, "a", "MOBILE"));
        }
        for _ in 0..5 {
            events.push(event(0, 2, "b", "MOBILE"));
        }
        for _ in 0..3 {
            events.push(event(0, 3, "c", "MOBILE"));
        }
        let ranked = top_wines(&events, 10);
        assert_eq!(ranked[0].wine_id, "a");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].wine_id, "b");
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[2].wine_id, "c");
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn hourly_stats_use_hour_of_day() {
        let events = vec![event(0, 0, "a", "MOBILE"), event(0, 23, "a", "MOBILE")];
        let rows = hourly_stats(&events);
        assert_eq!(rows[0].hour, 0);
        assert_eq!(rows[1].hour, 23);
    }

    #[test]
    fn os_breakdown_caps_at_five_and_defaults_unknown() {
        let mut events: Vec<ScanEventRow> = (0..6)
            .map(|i| {
                let mut e = event(0, i, "a", "MOBILE");
                e.operating_system = format!("OS{}", i);
                e
            })
            .collect();
        let mut blank = event(0, 7, "a", "MOBILE");
        blank.operating_system = String::new();
        events.push(blank);

        let shares = os_breakdown(&events);
        assert_eq!(shares.len(), 5);

        let mut only_blank = event(0, 1, "a", "MOBILE");
        only_blank.operating_system = String::new();
        let unknown = os_breakdown(&[only_blank]);
        assert_eq!(unknown[0].operating_system, "Unknown");
        assert_eq!(unknown[0].percent, 100);
    }

    #[test]
    fn trend_with_zero_previous_period() {
        assert_eq!(percent_change(50, 0), (0, false));
        assert_eq!(percent_change(0, 0), (0, false));
    }

    #[test]
    fn trend_rounds_and_signs() {
        assert_eq!(percent_change(150, 100), (50, true));
        assert_eq!(percent_change(100, 100), (0, false));
        assert_eq!(percent_change(49, 100), (-51, false));
    }

    #[test]
    fn rollups_sum_across_dates() {
        let events = vec![event(0, 1, "a", "MOBILE"), event(1, 2, "a", "MOBILE")];
        let regions = rollup_regions(&regional_stats(&events), 10);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].scan_count, 2);
        let hours = rollup_hours(&hourly_stats(&events));
        assert_eq!(hours.iter().map(|h| h.scan_count).sum::<u64>(), 2);
    }
}
