// Date range value object
// Ranges are inclusive on both ends and counted in whole days.

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(anyhow!("end date {} is before start date {}", end, start));
        }
        Ok(Self { start, end })
    }

    /// Trailing window ending today: `days` calendar days including `today`.
    pub fn trailing(days: u32, today: NaiveDate) -> Self {
        let start = today - Duration::days(i64::from(days.max(1)) - 1);
        Self { start, end: today }
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Same length, immediately preceding, non-overlapping.
    pub fn previous(&self) -> Self {
        let len = self.days();
        Self {
            start: self.start - Duration::days(len),
            end: self.start - Duration::days(1),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn start_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePreset {
    Days7,
    Days30,
    Days90,
    Year,
}

impl RangePreset {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "7days" => Ok(RangePreset::Days7),
            "30days" => Ok(RangePreset::Days30),
            "90days" => Ok(RangePreset::Days90),
            "year" => Ok(RangePreset::Year),
            other => Err(anyhow!(
                "unknown range '{}', expected 7days|30days|90days|year",
                other
            )),
        }
    }

    pub fn days(&self) -> u32 {
        match self {
            RangePreset::Days7 => 7,
            RangePreset::Days30 => 30,
            RangePreset::Days90 => 90,
            RangePreset::Year => 365,
        }
    }

    pub fn to_range(self, today: NaiveDate) -> DateRange {
        DateRange::trailing(self.days(), today)
    }
}
