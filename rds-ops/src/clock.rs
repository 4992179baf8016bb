//! Time source and JST calendar helpers

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};

use crate::constants::time::{BUSINESS_TIMEZONE, REPORT_TIMESTAMP_FORMAT};

/// Source of the current instant, injected so jobs can be run "on" any day
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Calendar date of `instant` in JST, regardless of the host timezone
pub fn business_date(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&BUSINESS_TIMEZONE).date_naive()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Formats an instant as e.g. `Jan 05, 2025, 18:30` in JST
pub fn format_jst(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&BUSINESS_TIMEZONE)
        .format(REPORT_TIMESTAMP_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_business_date_crosses_midnight_in_jst() {
        // 20:00 UTC on Jan 1 is already Jan 2 in Tokyo
        let instant = Utc.with_ymd_and_hms(2025, 1, 1, 20, 0, 0).unwrap();
        assert_eq!(
            business_date(instant),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_business_date_same_day() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 10, 1, 0, 0).unwrap();
        assert_eq!(
            business_date(instant),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );
    }

    #[test]
    fn test_format_jst() {
        let instant = Utc.with_ymd_and_hms(2025, 1, 5, 9, 30, 0).unwrap();
        assert_eq!(format_jst(instant), "Jan 05, 2025, 18:30");
    }

    #[test]
    fn test_is_weekend() {
        assert!(is_weekend(NaiveDate::from_ymd_opt(2025, 3, 8).unwrap()));
        assert!(is_weekend(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()));
        assert!(!is_weekend(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));
    }
}
