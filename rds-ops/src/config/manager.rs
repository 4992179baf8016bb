// File: rds-ops/src/config/manager.rs
use super::Config;
use crate::constants::{defaults, env};
use crate::errors::ConfigError;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: String) -> Result<Self> {
        let config = Self::load_configuration(&config_dir).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let main_config_path = format!("{}/main.toml", config_dir);

        let mut config = if Path::new(&main_config_path).exists() {
            let content =
                fs::read_to_string(&main_config_path)
                    .await
                    .map_err(|e| ConfigError::LoadFailed {
                        path: main_config_path.clone(),
                        reason: e.to_string(),
                    })?;

            toml::from_str::<Config>(&content).map_err(|e| ConfigError::ParseError {
                reason: format!("{}: {}", main_config_path, e),
            })?
        } else {
            warn!(
                "Main config not found at {}, using built-in defaults",
                main_config_path
            );
            Config::default()
        };

        if config.holidays.custom_path.is_none() {
            config.holidays.custom_path =
                Some(format!("{}/{}", config_dir, defaults::CUSTOM_HOLIDAY_FILE));
        }
        if config.secrets.file_path.is_none() {
            config.secrets.file_path = Some(format!("{}/{}", config_dir, defaults::SECRETS_FILE));
        }

        Self::apply_env_overrides(&mut config)?;

        info!(
            "Configuration loaded: schedule {} (start '{}', stop '{}'), snapshot report {}",
            if config.schedule.enabled { "enabled" } else { "disabled" },
            config.schedule.start_cron,
            config.schedule.stop_cron,
            if config.snapshot_report.enabled { "enabled" } else { "disabled" },
        );

        Ok(config)
    }

    /// Environment variables win over main.toml for the snapshot report inputs
    /// and the API key
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        if let Some(secret_name) = read_env(env::SECRET_NAME) {
            debug!("{} set, overriding snapshot_report.secret_name", env::SECRET_NAME);
            config.snapshot_report.secret_name = Some(secret_name);
        }

        if let Some(project_id) = read_env(env::PROJECT_ID) {
            debug!("{} set, overriding snapshot_report.project_id", env::PROJECT_ID);
            config.snapshot_report.project_id = Some(project_id);
        }

        if let Some(age_days) = read_env(env::SNAPSHOT_AGE_DAYS) {
            let parsed = age_days
                .trim()
                .parse::<u32>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: env::SNAPSHOT_AGE_DAYS.to_string(),
                    reason: format!("'{}' is not a whole number of days: {}", age_days, e),
                })?;
            config.snapshot_report.age_days = Some(parsed);
        }

        if let Some(api_key) = read_env(env::API_KEY) {
            debug!("{} set, overriding api_key", env::API_KEY);
            config.api_key = Some(api_key);
        }

        Ok(())
    }
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
