use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use time::OffsetDateTime;

pub fn millis_to_utc(ms: i64) -> OffsetDateTime {
    let nanos = i128::from(ms).saturating_mul(1_000_000);
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn current_millis() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() as i64 / 1_000_000
}

pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|err| anyhow!(err))
}

/// Tenant and wine ids end up inside repository filters, so the accepted
/// alphabet is strict.
pub fn validate_record_id(label: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{} is empty", label));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(anyhow!("{} contains invalid characters", label));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_alphabet() {
        assert!(validate_record_id("winery_id", "vinarstvi-novak_01").is_ok());
        assert!(validate_record_id("winery_id", "").is_err());
        assert!(validate_record_id("winery_id", "x'; DROP TABLE").is_err());
    }

    #[test]
    fn date_parsing() {
        assert!(parse_date("2026-03-10").is_ok());
        assert!(parse_date("10.3.2026").is_err());
    }
}
