use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::{ScanEventRow, WineRow};

#[async_trait]
pub trait ScanEventRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn insert_event(&self, event: &ScanEventRow) -> anyhow::Result<()>;
    /// Events for one tenant whose timestamp date falls inside the
    /// inclusive range, oldest first, capped at `limit` rows.
    async fn fetch_events(
        &self,
        winery_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        limit: usize,
    ) -> anyhow::Result<Vec<ScanEventRow>>;
    async fn count_events(
        &self,
        winery_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<u64>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait WineRepository: Send + Sync {
    async fn list_wines(&self, winery_id: &str) -> anyhow::Result<Vec<WineRow>>;
    async fn insert_wines(&self, wines: &[WineRow]) -> anyhow::Result<()>;
    /// Drops the tenant's registry before inserting the new rows.
    async fn replace_wines(&self, winery_id: &str, wines: &[WineRow]) -> anyhow::Result<()>;
}
