use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Locally curated days off, one ISO date in the first column of each row
pub struct CustomHolidays {
    path: PathBuf,
}

impl CustomHolidays {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All listed dates, or an empty set if the file is missing or unreadable
    pub async fn holidays(&self) -> BTreeSet<NaiveDate> {
        match self.load().await {
            Ok(holidays) => holidays,
            Err(e) => {
                warn!("Failed to load custom holidays: {:#}", e);
                BTreeSet::new()
            }
        }
    }

    async fn load(&self) -> Result<BTreeSet<NaiveDate>> {
        if !self.path.exists() {
            warn!(
                "Custom holiday file not found at {:?}, no custom holidays applied",
                self.path
            );
            return Ok(BTreeSet::new());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {:?}", self.path))?;

        let holidays = parse_custom_holidays(&content);
        info!(
            "Loaded {} custom holidays from {:?}",
            holidays.len(),
            self.path
        );
        Ok(holidays)
    }
}

/// Blank rows and `#` comments are ignored; unparseable cells are logged and skipped
pub fn parse_custom_holidays(content: &str) -> BTreeSet<NaiveDate> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut holidays = BTreeSet::new();
    for (index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping unreadable custom holiday row {}: {}", index + 1, e);
                continue;
            }
        };

        let cell = record.get(0).unwrap_or_default().trim();
        if cell.is_empty() || cell.starts_with('#') {
            continue;
        }

        match NaiveDate::parse_from_str(cell, "%Y-%m-%d") {
            Ok(date) => {
                holidays.insert(date);
            }
            Err(_) => warn!("Ignoring custom holiday '{}': expected YYYY-MM-DD", cell),
        }
    }

    holidays
}
