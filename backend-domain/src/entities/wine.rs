// Wine registry entity

use clickhouse::Row;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Persisted wine record. The registry is per tenant; `alcohol_percent`
/// is the label figure and kept as text.
#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct WineRow {
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub created_at: OffsetDateTime,
    pub wine_id: String,
    pub winery_id: String,
    pub name: String,
    pub batch: String,
    pub vintage: String,
    pub grape: String,
    pub alcohol_percent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WineRecordApi {
    pub wine_id: String,
    pub name: String,
    #[serde(default)]
    pub batch: String,
    #[serde(default)]
    pub vintage: String,
    #[serde(default)]
    pub grape: String,
    #[serde(default)]
    pub alcohol_percent: String,
}

impl WineRecordApi {
    pub fn normalized(&self) -> Self {
        Self {
            wine_id: self.wine_id.trim().to_string(),
            name: self.name.trim().to_string(),
            batch: self.batch.trim().to_string(),
            vintage: self.vintage.trim().to_string(),
            grape: self.grape.trim().to_string(),
            alcohol_percent: self.alcohol_percent.trim().to_string(),
        }
    }
}

impl From<&WineRow> for WineRecordApi {
    fn from(row: &WineRow) -> Self {
        Self {
            wine_id: row.wine_id.clone(),
            name: row.name.clone(),
            batch: row.batch.clone(),
            vintage: row.vintage.clone(),
            grape: row.grape.clone(),
            alcohol_percent: row.alcohol_percent.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WineRegistryPayload {
    pub wines: Vec<WineRecordApi>,
}

#[derive(Debug, Deserialize)]
pub struct WineRegistryQuery {
    pub winery_id: String,
}

#[derive(Debug, Deserialize)]
pub struct WineRegistryUpdateQuery {
    pub winery_id: String,
    /// "replace" drops the tenant's registry first; anything else merges.
    pub mode: Option<String>,
}
