// Scan event entity
// One record of a QR label being scanned, with derived metadata

use clickhouse::Row;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Inbound scan request body. Only `wine_id` and `winery_id` are required;
/// everything else defaults at recording time.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanPayload {
    #[serde(default)]
    pub wine_id: Option<String>,
    #[serde(default)]
    pub winery_id: Option<String>,
    #[serde(default)]
    pub wine_name: Option<String>,
    #[serde(default)]
    pub wine_batch: Option<String>,
    #[serde(default)]
    pub wine_vintage: Option<String>,
    #[serde(default)]
    pub winery_name: Option<String>,
    #[serde(default)]
    pub winery_slug: Option<String>,
    /// Language the public wine page was served in, if the page reports it.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,
}

/// Persisted scan event. Append-only; the wine and winery fields are a
/// snapshot taken at scan time and survive later edits of the wine.
/// `ip_address` is stored masked — the raw IP never reaches this struct.
#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct ScanEventRow {
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub timestamp: OffsetDateTime,
    pub event_id: String,
    pub winery_id: String,
    pub winery_name: String,
    pub winery_slug: String,
    pub wine_id: String,
    pub wine_name: String,
    pub wine_batch: String,
    pub wine_vintage: String,
    pub ip_address: String,
    pub device_type: String,
    pub operating_system: String,
    pub browser_language: String,
    pub country_code: String,
    pub region_code: String,
    pub city: String,
    pub language_used: String,
    pub referrer: String,
}

/// Response body for scan recording. The HTTP status is always 2xx; this
/// flag is the only signal distinguishing outcomes.
#[derive(Debug, Clone, Serialize)]
pub struct ScanAck {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanAck {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(reason.into()),
        }
    }
}

/// Result of a geolocation lookup. Empty strings mean the provider had no
/// answer (or was unreachable).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoInfo {
    pub country: String,
    pub region: String,
    pub city: String,
}

impl GeoInfo {
    /// Placeholder for loopback and private-range clients; those never hit
    /// the lookup provider.
    pub fn local() -> Self {
        Self {
            country: "LOCAL".to_string(),
            region: "DEV".to_string(),
            city: String::new(),
        }
    }
}
