use anyhow::{Context, Result};
use chrono::NaiveDate;
use encoding_rs::SHIFT_JIS;
use reqwest::Client;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::errors::{HolidayError, OpsError};

/// National holiday calendar published as a Shift_JIS CSV (`date,name`)
pub struct OfficialCalendar {
    url: String,
    client: Client,
}

impl OfficialCalendar {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for holiday calendar")?;

        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Holidays for `year`, or an empty set if the calendar is unavailable
    pub async fn holidays(&self, year: i32) -> BTreeSet<NaiveDate> {
        match self.fetch(year).await {
            Ok(holidays) => {
                info!("Fetched {} official holidays for {}", holidays.len(), year);
                holidays
            }
            Err(e) => {
                warn!("Failed to fetch holidays: {:#}", e);
                BTreeSet::new()
            }
        }
    }

    async fn fetch(&self, year: i32) -> Result<BTreeSet<NaiveDate>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.fetch_failed(e))?
            .error_for_status()
            .map_err(|e| self.fetch_failed(e))?;

        let bytes = response.bytes().await.map_err(|e| self.fetch_failed(e))?;
        let content = decode_shift_jis(&bytes).ok_or_else(|| HolidayError::DecodeFailed {
            url: self.url.clone(),
        })?;

        parse_calendar(&content, year)
    }

    fn fetch_failed(&self, err: reqwest::Error) -> HolidayError {
        HolidayError::FetchFailed {
            url: self.url.clone(),
            reason: err.to_string(),
        }
    }
}

/// None when the bytes are not valid Shift_JIS
pub fn decode_shift_jis(bytes: &[u8]) -> Option<String> {
    let (text, _, had_errors) = SHIFT_JIS.decode(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

/// Parses calendar CSV content, keeping only dates in `year`. The first row
/// is a header.
pub fn parse_calendar(content: &str, year: i32) -> Result<BTreeSet<NaiveDate>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut holidays = BTreeSet::new();
    for record in reader.records() {
        let record = record.map_err(|e| {
            OpsError::from(HolidayError::ParseFailed {
                reason: e.to_string(),
            })
        })?;

        let Some(cell) = record.get(0) else {
            continue;
        };

        match normalize_date(cell, year) {
            Some(date) => {
                holidays.insert(date);
            }
            None => debug!("Skipping calendar row '{}'", cell),
        }
    }

    Ok(holidays)
}

/// `2025/1/1` (or `2025-1-1`) to a date, if it falls in `year`
pub fn normalize_date(cell: &str, year: i32) -> Option<NaiveDate> {
    let normalized = cell.trim().replace('/', "-");
    let parts: Vec<&str> = normalized.split('-').collect();
    if parts.len() != 3 {
        return None;
    }

    let row_year = parts[0].parse::<i32>().ok()?;
    if row_year != year {
        return None;
    }

    let month = parts[1].parse::<u32>().ok()?;
    let day = parts[2].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
