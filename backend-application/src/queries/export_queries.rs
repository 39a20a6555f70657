// Export formatter
// Renders aggregate or registry rows as CSV (fixed header per type,
// standard quoting) or JSON (same rows plus export metadata).

use anyhow::anyhow;
use chrono::Utc;
use serde::Serialize;

use backend_domain::{DateRange, ExportQuery, WineRegistryQuery};

use crate::queries::{analytics_queries, wine_registry_queries};
use crate::{AppError, AppState};

const DEFAULT_EXPORT_DAYS: u32 = 30;
const RANKINGS_EXPORT_LIMIT: usize = 100;

const WINES_HEADER: &[&str] = &["wine_id", "name", "batch", "vintage", "grape", "alcohol_percent"];
const DAILY_HEADER: &[&str] = &[
    "date",
    "scan_count",
    "unique_visitors",
    "mobile",
    "tablet",
    "desktop",
];
const REGIONAL_HEADER: &[&str] = &["date", "country_code", "region_code", "city", "scan_count"];
const LANGUAGE_HEADER: &[&str] = &["date", "language", "scan_count"];
const HOURLY_HEADER: &[&str] = &["date", "hour", "scan_count"];
const RANKINGS_HEADER: &[&str] = &["rank", "wine_id", "wine_name", "scan_count"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Wines,
    Daily,
    Regional,
    Language,
    Hourly,
    Rankings,
}

impl ExportKind {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim().to_lowercase().as_str() {
            "wines" => Ok(ExportKind::Wines),
            "daily" => Ok(ExportKind::Daily),
            "regional" => Ok(ExportKind::Regional),
            "language" => Ok(ExportKind::Language),
            "hourly" => Ok(ExportKind::Hourly),
            "rankings" => Ok(ExportKind::Rankings),
            other => Err(AppError::BadRequest(format!(
                "unknown export type '{}'",
                other
            ))),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Wines => "wines",
            ExportKind::Daily => "daily",
            ExportKind::Regional => "regional",
            ExportKind::Language => "language",
            ExportKind::Hourly => "hourly",
            ExportKind::Rankings => "rankings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(value: Option<&str>) -> Result<Self, AppError> {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            None | Some("csv") => Ok(ExportFormat::Csv),
            Some("json") => Ok(ExportFormat::Json),
            Some(other) => Err(AppError::BadRequest(format!(
                "unknown export format '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug)]
pub struct ExportOutput {
    pub content_type: &'static str,
    pub filename: String,
    pub body: String,
}

pub async fn export_data(state: &AppState, query: ExportQuery) -> Result<ExportOutput, AppError> {
    analytics_queries::validate_winery(&query.winery_id)?;
    let kind = ExportKind::parse(&query.export_type)?;
    let format = ExportFormat::parse(query.format.as_deref())?;
    let range = resolve_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    state.metrics.record_export();

    let body = match kind {
        ExportKind::Wines => {
            let rows = wine_registry_queries::list_wine_registry(
                state,
                WineRegistryQuery {
                    winery_id: query.winery_id.clone(),
                },
            )
            .await?;
            render(format, WINES_HEADER, &rows)?
        }
        ExportKind::Daily => {
            let rows = analytics_queries::daily_stats(state, &query.winery_id, &range).await?;
            render(format, DAILY_HEADER, &rows)?
        }
        ExportKind::Regional => {
            let rows = analytics_queries::regional_stats(state, &query.winery_id, &range).await?;
            render(format, REGIONAL_HEADER, &rows)?
        }
        ExportKind::Language => {
            let rows = analytics_queries::language_stats(state, &query.winery_id, &range).await?;
            render(format, LANGUAGE_HEADER, &rows)?
        }
        ExportKind::Hourly => {
            let rows = analytics_queries::hourly_stats(state, &query.winery_id, &range).await?;
            render(format, HOURLY_HEADER, &rows)?
        }
        ExportKind::Rankings => {
            let rows = analytics_queries::top_wines(
                state,
                &query.winery_id,
                &range,
                RANKINGS_EXPORT_LIMIT,
            )
            .await?;
            render(format, RANKINGS_HEADER, &rows)?
        }
    };

    let (content_type, extension) = match format {
        ExportFormat::Csv => ("text/csv; charset=utf-8", "csv"),
        ExportFormat::Json => ("application/json", "json"),
    };
    Ok(ExportOutput {
        content_type,
        filename: format!(
            "vinqr-{}-{}_{}.{}",
            kind.as_str(),
            range.start_str(),
            range.end_str(),
            extension
        ),
        body,
    })
}

fn resolve_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange, AppError> {
    match (start, end) {
        (Some(start), Some(end)) => {
            let start = backend_domain::parse_date(start)
                .map_err(|err| AppError::BadRequest(format!("invalid start_date: {}", err)))?;
            let end = backend_domain::parse_date(end)
                .map_err(|err| AppError::BadRequest(format!("invalid end_date: {}", err)))?;
            DateRange::new(start, end).map_err(|err| AppError::BadRequest(err.to_string()))
        }
        (None, None) => Ok(DateRange::trailing(
            DEFAULT_EXPORT_DAYS,
            Utc::now().date_naive(),
        )),
        _ => Err(AppError::BadRequest(
            "start_date and end_date must be given together".to_string(),
        )),
    }
}

fn render<T: Serialize>(
    format: ExportFormat,
    header: &[&str],
    rows: &[T],
) -> Result<String, AppError> {
    match format {
        ExportFormat::Csv => rows_to_csv(header, rows),
        ExportFormat::Json => rows_to_json(rows),
    }
}

/// Fixed header first, then one record per row. The csv writer applies
/// standard quoting: fields containing commas, quotes, or newlines are
/// wrapped in double quotes with inner quotes doubled.
fn rows_to_csv<T: Serialize>(header: &[&str], rows: &[T]) -> Result<String, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(header)
        .map_err(|err| AppError::Internal(anyhow!(err)))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|err| AppError::Internal(anyhow!(err)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| AppError::Internal(anyhow!(err.to_string())))?;
    String::from_utf8(bytes).map_err(|err| AppError::Internal(anyhow!(err)))
}

fn rows_to_json<T: Serialize>(rows: &[T]) -> Result<String, AppError> {
    let document = serde_json::json!({
        "export_date": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "rows": rows,
    });
    serde_json::to_string(&document).map_err(|err| AppError::Internal(anyhow!(err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::{WineRankRow, WineRecordApi};

    #[test]
    fn csv_quoting_round_trips_awkward_fields() {
        let rows = vec![WineRecordApi {
            wine_id: "w1".to_string(),
            name: "He said, \"hi\"\n".to_string(),
            batch: String::new(),
            vintage: "2023".to_string(),
            grape: String::new(),
            alcohol_percent: "12,5".to_string(),
        }];
        let csv_text = rows_to_csv(WINES_HEADER, &rows).expect("render");
        assert!(csv_text.contains("\"He said, \"\"hi\"\"\n\""));

        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let parsed: WineRecordApi = reader
            .deserialize()
            .next()
            .expect("one record")
            .expect("parse");
        assert_eq!(parsed.name, "He said, \"hi\"\n");
        assert_eq!(parsed.alcohol_percent, "12,5");
    }

    #[test]
    fn csv_header_is_written_even_without_rows() {
        let rows: Vec<WineRankRow> = Vec::new();
        let csv_text = rows_to_csv(RANKINGS_HEADER, &rows).expect("render");
        assert_eq!(csv_text.trim_end(), "rank,wine_id,wine_name,scan_count");
    }

    #[test]
    fn json_export_carries_metadata() {
        let rows = vec![WineRankRow {
            rank: 1,
            wine_id: "w1".to_string(),
            wine_name: "Pálava".to_string(),
            scan_count: 12,
        }];
        let body = rows_to_json(&rows).expect("render");
        let value: serde_json::Value = serde_json::from_str(&body).expect("parse");
        assert!(value.get("export_date").is_some());
        assert_eq!(
            value.get("version").and_then(|v| v.as_str()),
            Some(env!("CARGO_PKG_VERSION"))
        );
        assert_eq!(value["rows"][0]["wine_name"], "Pálava");
    }

    #[test]
    fn export_kind_and_format_parsing() {
        assert_eq!(ExportKind::parse("Daily").expect("kind"), ExportKind::Daily);
        assert!(ExportKind::parse("pdf").is_err());
        assert_eq!(
            ExportFormat::parse(None).expect("format"),
            ExportFormat::Csv
        );
        assert_eq!(
            ExportFormat::parse(Some("json")).expect("format"),
            ExportFormat::Json
        );
        assert!(ExportFormat::parse(Some("xml")).is_err());
    }

    #[test]
    fn range_requires_both_bounds_or_neither() {
        assert!(resolve_range(Some("2026-03-01"), Some("2026-03-10")).is_ok());
        assert!(resolve_range(Some("2026-03-01"), None).is_err());
        assert!(resolve_range(None, None).is_ok());
        assert!(resolve_range(Some("2026-03-10"), Some("2026-03-01")).is_err());
    }
}
