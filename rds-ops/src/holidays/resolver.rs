use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::{CalendarDay, CustomHolidays, HolidaySet, OfficialCalendar};
use crate::config::HolidayConfig;
use crate::constants::defaults;

/// Merges the official and custom calendars. Nothing is cached between calls.
pub struct HolidayResolver {
    official: OfficialCalendar,
    custom: CustomHolidays,
}

impl HolidayResolver {
    pub fn new(official: OfficialCalendar, custom: CustomHolidays) -> Self {
        Self { official, custom }
    }

    pub fn from_config(config: &HolidayConfig) -> Result<Self> {
        let official = OfficialCalendar::new(
            config.official_url.clone(),
            Duration::from_secs(config.fetch_timeout_seconds),
        )?;
        let custom_path = config
            .custom_path
            .clone()
            .unwrap_or_else(|| defaults::CUSTOM_HOLIDAY_FILE.to_string());

        Ok(Self::new(official, CustomHolidays::new(custom_path)))
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, year: i32) -> HolidaySet {
        debug!(
            "Resolving holidays from {} and {:?}",
            self.official.url(),
            self.custom.path()
        );

        let official = self.official.holidays(year).await;
        let custom = self.custom.holidays().await;

        info!(
            "Holidays for {}: {} official, {} custom",
            year,
            official.len(),
            custom.len()
        );

        HolidaySet { official, custom }
    }

    pub async fn preview(&self, year: i32) -> Vec<CalendarDay> {
        self.resolve(year).await.preview(year)
    }
}
