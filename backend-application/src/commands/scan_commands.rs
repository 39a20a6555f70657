use time::OffsetDateTime;
use tracing::{error, warn};
use uuid::Uuid;

use backend_domain::services::{classify_device, detect_os, primary_language};
use backend_domain::services::{is_private_or_loopback, mask_ip};
use backend_domain::{GeoInfo, ScanAck, ScanEventRow, ScanPayload};

use crate::AppState;

const DEFAULT_WINE_NAME: &str = "Unknown Wine";
const DEFAULT_WINERY_NAME: &str = "Unknown Winery";

/// Request metadata the HTTP layer pulls off the headers.
#[derive(Debug, Default, Clone)]
pub struct ScanContext {
    pub forwarded_for: Option<String>,
    pub user_agent: Option<String>,
    pub accept_language: Option<String>,
    pub referrer: Option<String>,
}

/// Record one scan. This never returns an error: the caller is an
/// anonymous label scanner, so every failure becomes a logged
/// `success:false` ack behind a 2xx response.
pub async fn record_scan(state: &AppState, payload: ScanPayload, ctx: ScanContext) -> ScanAck {
    let wine_id = payload.wine_id.as_deref().map(str::trim).unwrap_or("");
    let winery_id = payload.winery_id.as_deref().map(str::trim).unwrap_or("");
    if wine_id.is_empty() || winery_id.is_empty() {
        state.metrics.record_scan_rejected();
        return ScanAck::rejected("wine_id and winery_id are required");
    }

    let client_ip = ctx
        .forwarded_for
        .as_deref()
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("127.0.0.1")
        .to_string();

    let geo = if is_private_or_loopback(&client_ip) {
        GeoInfo::local()
    } else {
        match state.geo.lookup(&client_ip).await {
            Ok(info) => info,
            Err(err) => {
                // Never fail a scan over geolocation; record it without.
                warn!("geolocation lookup failed: {}", err);
                GeoInfo::default()
            }
        }
    };

    let user_agent = ctx.user_agent.as_deref().unwrap_or("");
    let device_type = classify_device(user_agent);
    let operating_system = detect_os(user_agent);
    let browser_language = primary_language(ctx.accept_language.as_deref().unwrap_or(""));

    let event = ScanEventRow {
        timestamp: OffsetDateTime::now_utc(),
        event_id: Uuid::new_v4().to_string(),
        winery_id: winery_id.to_string(),
        winery_name: non_empty_or(payload.winery_name, DEFAULT_WINERY_NAME),
        winery_slug: non_empty_or(payload.winery_slug, ""),
        wine_id: wine_id.to_string(),
        wine_name: non_empty_or(payload.wine_name, DEFAULT_WINE_NAME),
        wine_batch: non_empty_or(payload.wine_batch, ""),
        wine_vintage: non_empty_or(payload.wine_vintage, ""),
        ip_address: mask_ip(&client_ip),
        device_type: device_type.as_str().to_string(),
        operating_system,
        browser_language,
        country_code: geo.country,
        region_code: geo.region,
        city: geo.city,
        language_used: non_empty_or(payload.language, ""),
        referrer: payload
            .referrer
            .or(ctx.referrer)
            .map(|value| value.trim().to_string())
            .unwrap_or_default(),
    };

    match state.scan_repo.insert_event(&event).await {
        Ok(()) => {
            state.metrics.record_scan();
            ScanAck::ok()
        }
        Err(err) => {
            error!("failed to persist scan event: {}", err);
            state.metrics.record_scan_failure();
            ScanAck::rejected("failed to record scan")
        }
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                default.to_string()
            } else {
                trimmed.to_string()
            }
        }
        None => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use tokio::sync::Mutex;

    use backend_domain::ports::{GeoLookup, ScanEventRepository, WineRepository};
    use backend_domain::{RuntimeConfig, WineRow};

    use crate::Metrics;

    #[derive(Default)]
    struct RecordingRepo {
        rows: Mutex<Vec<ScanEventRow>>,
    }

    #[async_trait]
    impl ScanEventRepository for RecordingRepo {
        async fn ensure_schema(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn insert_event(&self, event: &ScanEventRow) -> anyhow::Result<()> {
            self.rows.lock().await.push(event.clone());
            Ok(())
        }

        async fn fetch_events(
            &self,
            _winery_id: &str,
            _start: NaiveDate,
            _end: NaiveDate,
            _limit: usize,
        ) -> anyhow::Result<Vec<ScanEventRow>> {
            Ok(Vec::new())
        }

        async fn count_events(
            &self,
            _winery_id: &str,
            _start: NaiveDate,
            _end: NaiveDate,
        ) -> anyhow::Result<u64> {
            Ok(0)
        }

        async fn ping(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct NoWines;

    #[async_trait]
    impl WineRepository for NoWines {
        async fn list_wines(&self, _winery_id: &str) -> anyhow::Result<Vec<WineRow>> {
            Ok(Vec::new())
        }

        async fn insert_wines(&self, _wines: &[WineRow]) -> anyhow::Result<()> {
            Ok(())
        }

        async fn replace_wines(&self, _winery_id: &str, _wines: &[WineRow]) -> anyhow::Result<()> {
            Ok(())
        }
    }

    /// Always-unreachable provider, for the degrade-to-empty fallback.
    struct FailingGeo;

    #[async_trait]
    impl GeoLookup for FailingGeo {
        async fn lookup(&self, _ip: &str) -> anyhow::Result<GeoInfo> {
            Err(anyhow::anyhow!("provider unreachable"))
        }
    }

    #[derive(Default)]
    struct CountingGeo {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GeoLookup for CountingGeo {
        async fn lookup(&self, _ip: &str) -> anyhow::Result<GeoInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(GeoInfo {
                country: "CZ".to_string(),
                region: "Jihomoravský kraj".to_string(),
                city: "Brno".to_string(),
            })
        }
    }

    fn test_config() -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            api_token: None,
            geo_base_url: "http://geo.invalid".to_string(),
            geo_token: None,
            max_fetch_rows: 10_000,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 5,
        }
    }

    fn test_state() -> (AppState, Arc<RecordingRepo>, Arc<CountingGeo>) {
        let repo = Arc::new(RecordingRepo::default());
        let geo = Arc::new(CountingGeo::default());
        let state = AppState {
            config: test_config(),
            scan_repo: repo.clone(),
            wine_repo: Arc::new(NoWines),
            geo: geo.clone(),
            metrics: Arc::new(Metrics::default()),
        };
        (state, repo, geo)
    }

    fn payload() -> ScanPayload {
        ScanPayload {
            wine_id: Some("wine-1".to_string()),
            winery_id: Some("winery-1".to_string()),
            wine_name: None,
            wine_batch: None,
            wine_vintage: None,
            winery_name: None,
            winery_slug: None,
            language: Some("cs".to_string()),
            referrer: None,
        }
    }

    #[tokio::test]
    async fn missing_wine_id_is_rejected_without_insert() {
        let (state, repo, _geo) = test_state();
        let mut bad = payload();
        bad.wine_id = None;

        let ack = record_scan(&state, bad, ScanContext::default()).await;
        assert!(!ack.success);
        assert!(repo.rows.lock().await.is_empty());
    }

    #[tokio::test]
    async fn private_client_skips_geolocation() {
        let (state, repo, geo) = test_state();
        let ctx = ScanContext {
            forwarded_for: Some("192.168.1.10".to_string()),
            ..ScanContext::default()
        };

        let ack = record_scan(&state, payload(), ctx).await;
        assert!(ack.success);
        assert_eq!(geo.calls.load(Ordering::SeqCst), 0);

        let rows = repo.rows.lock().await;
        assert_eq!(rows[0].country_code, "LOCAL");
        assert_eq!(rows[0].region_code, "DEV");
    }

    #[tokio::test]
    async fn public_client_is_geolocated_and_masked() {
        let (state, repo, geo) = test_state();
        let ctx = ScanContext {
            forwarded_for: Some("203.0.113.7, 10.0.0.1".to_string()),
            user_agent: Some(
                "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) Mobile/15E148".to_string(),
            ),
            accept_language: Some("cs-CZ,cs;q=0.9".to_string()),
            ..ScanContext::default()
        };

        let ack = record_scan(&state, payload(), ctx).await;
        assert!(ack.success);
        assert_eq!(geo.calls.load(Ordering::SeqCst), 1);

        let rows = repo.rows.lock().await;
        let row = &rows[0];
        assert_eq!(row.ip_address, "203.0.*.*");
        assert_eq!(row.country_code, "CZ");
        assert_eq!(row.device_type, "MOBILE");
        assert_eq!(row.operating_system, "iOS");
        assert_eq!(row.browser_language, "cs-cz");
        assert_eq!(row.wine_name, "Unknown Wine");
        assert_eq!(row.winery_name, "Unknown Winery");
        assert_eq!(row.language_used, "cs");
    }

    #[tokio::test]
    async fn geolocation_failure_degrades_to_empty_fields() {
        let repo = Arc::new(RecordingRepo::default());
        let state = AppState {
            config: test_config(),
            scan_repo: repo.clone(),
            wine_repo: Arc::new(NoWines),
            geo: Arc::new(FailingGeo),
            metrics: Arc::new(Metrics::default()),
        };
        let ctx = ScanContext {
            forwarded_for: Some("203.0.113.7".to_string()),
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            ),
            ..ScanContext::default()
        };

        let ack = record_scan(&state, payload(), ctx).await;
        assert!(ack.success);

        let rows = repo.rows.lock().await;
        let row = &rows[0];
        assert_eq!(row.country_code, "");
        assert_eq!(row.region_code, "");
        assert_eq!(row.city, "");
        // The rest of the pipeline still ran.
        assert_eq!(row.ip_address, "203.0.*.*");
        assert_eq!(row.device_type, "DESKTOP");
    }

    #[tokio::test]
    async fn absent_forwarded_header_defaults_to_loopback() {
        let (state, repo, geo) = test_state();
        let ack = record_scan(&state, payload(), ScanContext::default()).await;
        assert!(ack.success);
        assert_eq!(geo.calls.load(Ordering::SeqCst), 0);
        assert_eq!(repo.rows.lock().await[0].ip_address, "127.0.*.*");
    }
}
