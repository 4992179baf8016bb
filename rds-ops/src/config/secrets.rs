// File: rds-ops/src/config/secrets.rs
//! Secret lookup for the task API bearer token.
//!
//! In production the token lives in AWS Secrets Manager as a JSON object,
//! e.g. `{"ASANA_TOKEN": "..."}`. For local runs the same JSON strings can be
//! kept in a TOML file (config/secrets.toml) excluded from version control.
//!
//! Example secrets.toml:
//! ```toml
//! [secrets]
//! rds-snapshot-checker = '{"ASANA_TOKEN": "0/abc123"}'
//! ```

use crate::errors::ReportError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Raw secret string stored under `name`
    async fn secret_string(&self, name: &str) -> Result<String>;
}

/// Reads `key` out of the JSON object stored under `name`
pub async fn resolve_token(store: &dyn SecretStore, name: &str, key: &str) -> Result<String> {
    let raw = store.secret_string(name).await?;
    let document: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Secret '{}' is not a JSON object", name))?;

    let token = document
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ReportError::SecretKeyMissing {
            name: name.to_string(),
            key: key.to_string(),
        })?;

    debug!("Resolved token from secret '{}'", name);
    Ok(token.to_string())
}

pub struct AwsSecretStore {
    client: aws_sdk_secretsmanager::Client,
}

impl AwsSecretStore {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_secretsmanager::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    async fn secret_string(&self, name: &str) -> Result<String> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(name)
            .send()
            .await
            .with_context(|| format!("GetSecretValue failed for '{}'", name))?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| {
                ReportError::SecretNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }
}

/// Structure matching the secrets.toml file format
#[derive(Debug, Deserialize, Default)]
pub struct SecretsFile {
    #[serde(default)]
    pub secrets: HashMap<String, String>,
}

/// Secret store backed by a local TOML file
pub struct FileSecretStore {
    secrets: SecretsFile,
}

impl FileSecretStore {
    /// Load secrets from the specified file path.
    /// Returns an empty store if the file doesn't exist.
    pub fn load(secrets_path: &Path) -> Result<Self> {
        if !secrets_path.exists() {
            warn!(
                "Secrets file not found at {:?}, secret lookups will fail",
                secrets_path
            );
            return Ok(Self {
                secrets: SecretsFile::default(),
            });
        }

        let content = std::fs::read_to_string(secrets_path)
            .with_context(|| format!("Failed to read secrets file: {:?}", secrets_path))?;

        let secrets: SecretsFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse secrets file: {:?}", secrets_path))?;

        info!(
            "Loaded {} secrets from {:?}",
            secrets.secrets.len(),
            secrets_path
        );

        Ok(Self { secrets })
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn secret_string(&self, name: &str) -> Result<String> {
        self.secrets.secrets.get(name).cloned().ok_or_else(|| {
            ReportError::SecretNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_load_secrets_and_resolve_token() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[secrets]
rds-snapshot-checker = '{{"ASANA_TOKEN": "secret-token-1"}}'
"#
        )
        .unwrap();

        let store = FileSecretStore::load(file.path()).unwrap();

        let token = resolve_token(&store, "rds-snapshot-checker", "ASANA_TOKEN")
            .await
            .unwrap();
        assert_eq!(token, "secret-token-1");
        assert!(store.secret_string("unknown").await.is_err());
    }

    #[tokio::test]
    async fn test_resolve_token_missing_key() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[secrets]\nchecker = '{{\"OTHER\": \"x\"}}'").unwrap();

        let store = FileSecretStore::load(file.path()).unwrap();
        let err = resolve_token(&store, "checker", "ASANA_TOKEN")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("ASANA_TOKEN"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let store = FileSecretStore::load(Path::new("/nonexistent/path/secrets.toml")).unwrap();
        assert!(store.secret_string("any").await.is_err());
    }
}
