use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use clickhouse::Client;

use backend_domain::ports::{ScanEventRepository, WineRepository};
use backend_domain::{ScanEventRow, WineRow};

#[derive(Clone)]
pub struct ClickhouseRepo {
    client: Client,
    database: String,
}

impl ClickhouseRepo {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }
}

const SCAN_EVENT_COLUMNS: &str = "timestamp, event_id, winery_id, winery_name, winery_slug, \
     wine_id, wine_name, wine_batch, wine_vintage, ip_address, device_type, \
     operating_system, browser_language, country_code, region_code, city, \
     language_used, referrer";

const WINE_COLUMNS: &str =
    "created_at, wine_id, winery_id, name, batch, vintage, grape, alcohol_percent";

#[async_trait]
impl ScanEventRepository for ClickhouseRepo {
    async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;

        let create_events = r#"
CREATE TABLE IF NOT EXISTS scan_events (
    timestamp DateTime64(3),
    event_id String,
    winery_id String,
    winery_name String,
    winery_slug String,
    wine_id String,
    wine_name String,
    wine_batch String,
    wine_vintage String,
    ip_address String,
    device_type String,
    operating_system String,
    browser_language String,
    country_code String,
    region_code String,
    city String,
    language_used String,
    referrer String
) ENGINE = MergeTree
PARTITION BY toDate(timestamp)
ORDER BY (winery_id, timestamp)
TTL toDateTime(timestamp) + INTERVAL 730 DAY
"#;
        self.client.query(create_events).execute().await?;

        let create_wines = r#"
CREATE TABLE IF NOT EXISTS wines (
    created_at DateTime64(3),
    wine_id String,
    winery_id String,
    name String,
    batch String,
    vintage String,
    grape String,
    alcohol_percent String
) ENGINE = ReplacingMergeTree(created_at)
ORDER BY (winery_id, wine_id)
"#;
        self.client.query(create_wines).execute().await?;
        Ok(())
    }

    async fn insert_event(&self, event: &ScanEventRow) -> Result<()> {
        let mut insert = self.client.insert("scan_events")?;
        insert.write(event).await?;
        insert.end().await?;
        Ok(())
    }

    async fn fetch_events(
        &self,
        winery_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        limit: usize,
    ) -> Result<Vec<ScanEventRow>> {
        let query = format!(
            "SELECT {} FROM scan_events \
             WHERE winery_id = '{}' \
             AND toDate(timestamp) >= toDate('{}') \
             AND toDate(timestamp) <= toDate('{}') \
             ORDER BY timestamp ASC LIMIT {}",
            SCAN_EVENT_COLUMNS, winery_id, start, end, limit
        );
        let rows = self.client.query(&query).fetch_all::<ScanEventRow>().await?;
        Ok(rows)
    }

    async fn count_events(&self, winery_id: &str, start: NaiveDate, end: NaiveDate) -> Result<u64> {
        let query = format!(
            "SELECT count() FROM scan_events \
             WHERE winery_id = '{}' \
             AND toDate(timestamp) >= toDate('{}') \
             AND toDate(timestamp) <= toDate('{}')",
            winery_id, start, end
        );
        let count: u64 = self.client.query(&query).fetch_one().await?;
        Ok(count)
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}

#[async_trait]
impl WineRepository for ClickhouseRepo {
    async fn list_wines(&self, winery_id: &str) -> Result<Vec<WineRow>> {
        let query = format!(
            "SELECT {} FROM wines FINAL WHERE winery_id = '{}' ORDER BY name ASC",
            WINE_COLUMNS, winery_id
        );
        let rows = self.client.query(&query).fetch_all::<WineRow>().await?;
        Ok(rows)
    }

    async fn insert_wines(&self, wines: &[WineRow]) -> Result<()> {
        let mut insert = self.client.insert("wines")?;
        for wine in wines {
            insert.write(wine).await?;
        }
        insert.end().await?;
        Ok(())
    }

    async fn replace_wines(&self, winery_id: &str, wines: &[WineRow]) -> Result<()> {
        let delete = format!(
            "ALTER TABLE wines DELETE WHERE winery_id = '{}'",
            winery_id
        );
        self.client.query(&delete).execute().await?;
        self.insert_wines(wines).await
    }
}
