//! Application-wide constants for timeouts, tags, endpoints and defaults
//!
//! Organized by concern so the wiring in `main` and the defaults in
//! `config` read from a single place.

use std::time::Duration;

/// Civil timezone used for business-day decisions and report timestamps
pub mod time {
    use chrono_tz::Tz;

    /// All "today" calculations happen in Japan Standard Time
    pub const BUSINESS_TIMEZONE: Tz = chrono_tz::Asia::Tokyo;

    /// Suffix appended to JST timestamps in reports
    pub const BUSINESS_TIMEZONE_LABEL: &str = "UTC+09:00";

    /// Human readable timestamp format used in snapshot reports
    pub const REPORT_TIMESTAMP_FORMAT: &str = "%b %d, %Y, %H:%M";
}

/// Opt-in marker for automated start/stop
pub mod tags {
    pub const AUTO_SCHEDULE_KEY: &str = "AutoSchedule";
    pub const AUTO_SCHEDULE_VALUE: &str = "true";
}

/// HTTP client timeout constants
pub mod http {
    use super::Duration;

    /// Timeout for fetching the official holiday calendar
    pub const HOLIDAY_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

    /// Timeout for task API requests
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Default configuration values
pub mod defaults {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8095;

    /// Cabinet Office national holiday calendar (Shift_JIS CSV)
    pub const OFFICIAL_HOLIDAY_URL: &str = "https://www8.cao.go.jp/chosei/shukujitsu/syukujitsu.csv";

    pub const CUSTOM_HOLIDAY_FILE: &str = "custom_holidays.csv";

    /// Weekday mornings and evenings, evaluated in JST
    pub const START_SCHEDULE: &str = "0 0 8 * * Mon-Fri";
    pub const STOP_SCHEDULE: &str = "0 0 21 * * Mon-Fri";

    /// Mondays at 10:00 JST
    pub const SNAPSHOT_REPORT_SCHEDULE: &str = "0 0 10 * * Mon";

    pub const TASK_API_BASE_URL: &str = "https://app.asana.com/api/1.0";
    pub const SECRET_TOKEN_KEY: &str = "ASANA_TOKEN";
    pub const SECRETS_FILE: &str = "secrets.toml";

    /// Upper bound for `snapshot_report.age_days` (about 100 years)
    pub const MAX_SNAPSHOT_AGE_DAYS: u32 = 36_500;
}

/// Environment variables that override main.toml
pub mod env {
    pub const SECRET_NAME: &str = "SECRET_NAME";
    pub const PROJECT_ID: &str = "ASANA_PROJECT_ID";
    pub const SNAPSHOT_AGE_DAYS: &str = "SNAPSHOT_AGE_DAYS";

    /// Bearer token required by the HTTP trigger routes
    pub const API_KEY: &str = "RDS_OPS_API_KEY";
}
