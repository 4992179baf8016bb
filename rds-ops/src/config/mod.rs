// File: rds-ops/src/config/mod.rs
pub mod manager;
pub mod secrets;

use serde::{Deserialize, Serialize};

use crate::constants::{defaults, http};
use crate::errors::ConfigError;

pub use manager::ConfigManager;
pub use secrets::{AwsSecretStore, FileSecretStore, SecretStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub schedule: ScheduleConfig,
    pub holidays: HolidayConfig,
    pub snapshot_report: SnapshotReportConfig,
    pub secrets: SecretsConfig,
    /// Bearer token for the trigger routes; they reject every call when unset
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            schedule: ScheduleConfig::default(),
            holidays: HolidayConfig::default(),
            snapshot_report: SnapshotReportConfig::default(),
            secrets: SecretsConfig::default(),
            api_key: None,
        }
    }
}

/// Cron triggers for the start/stop job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub enabled: bool,
    pub start_cron: String,
    pub stop_cron: String,
    /// Also treat Saturdays and Sundays as non-business days
    pub skip_weekends: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start_cron: defaults::START_SCHEDULE.to_string(),
            stop_cron: defaults::STOP_SCHEDULE.to_string(),
            skip_weekends: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HolidayConfig {
    pub official_url: String,
    /// Filled in relative to the config directory when unset
    pub custom_path: Option<String>,
    pub fetch_timeout_seconds: u64,
}

impl Default for HolidayConfig {
    fn default() -> Self {
        Self {
            official_url: defaults::OFFICIAL_HOLIDAY_URL.to_string(),
            custom_path: None,
            fetch_timeout_seconds: http::HOLIDAY_FETCH_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotReportConfig {
    pub enabled: bool,
    pub cron: String,
    pub secret_name: Option<String>,
    /// Key inside the JSON secret holding the bearer token
    pub secret_key: String,
    pub project_id: Option<String>,
    pub age_days: Option<u32>,
    pub api_base_url: String,
}

impl Default for SnapshotReportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cron: defaults::SNAPSHOT_REPORT_SCHEDULE.to_string(),
            secret_name: None,
            secret_key: defaults::SECRET_TOKEN_KEY.to_string(),
            project_id: None,
            age_days: None,
            api_base_url: defaults::TASK_API_BASE_URL.to_string(),
        }
    }
}

/// Snapshot report settings with every required value present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotReportSettings {
    pub secret_name: String,
    pub secret_key: String,
    pub project_id: String,
    pub age_days: u32,
}

impl SnapshotReportConfig {
    /// Fails on the first missing or out-of-range value
    pub fn validate(&self) -> Result<SnapshotReportSettings, ConfigError> {
        let secret_name = required(&self.secret_name, "snapshot_report.secret_name")?;
        let project_id = required(&self.project_id, "snapshot_report.project_id")?;
        let age_days = self.age_days.ok_or_else(|| ConfigError::MissingRequired {
            field: "snapshot_report.age_days".to_string(),
        })?;

        if age_days > defaults::MAX_SNAPSHOT_AGE_DAYS {
            return Err(ConfigError::InvalidValue {
                field: "snapshot_report.age_days".to_string(),
                reason: format!(
                    "{} exceeds the maximum of {} days",
                    age_days,
                    defaults::MAX_SNAPSHOT_AGE_DAYS
                ),
            });
        }

        if self.secret_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "snapshot_report.secret_key".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(SnapshotReportSettings {
            secret_name,
            secret_key: self.secret_key.clone(),
            project_id,
            age_days,
        })
    }
}

fn required(value: &Option<String>, field: &str) -> Result<String, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::MissingRequired {
            field: field.to_string(),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretBackend {
    Aws,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretsConfig {
    pub backend: SecretBackend,
    /// Filled in relative to the config directory when unset
    pub file_path: Option<String>,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            backend: SecretBackend::Aws,
            file_path: None,
        }
    }
}
