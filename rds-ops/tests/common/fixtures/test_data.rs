//! Common test data, builders and static collaborators

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use rds_ops::clock::Clock;
use rds_ops::config::SecretStore;
use rds_ops::constants::time::BUSINESS_TIMEZONE;
use rds_ops::holidays::{CustomHolidays, HolidayResolver, OfficialCalendar};
use rds_ops::rds::{AccountIdentity, LifecycleStatus, ManagedResource, ResourceKind, Snapshot};

pub const ACCOUNT_ID: &str = "123456789012";
pub const PROJECT_ID: &str = "1200000000000001";
pub const SECRET_NAME: &str = "rds-snapshot-checker";
pub const TOKEN: &str = "0/test-token";

/// Clock frozen at one instant
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Instant for a wall-clock time in Tokyo
pub fn jst(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    BUSINESS_TIMEZONE
        .with_ymd_and_hms(y, m, d, hour, minute, 0)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn resource(
    kind: ResourceKind,
    identifier: &str,
    status: &str,
    tags: &[(&str, &str)],
) -> ManagedResource {
    ManagedResource {
        kind,
        identifier: identifier.to_string(),
        arn: format!("arn:aws:rds:ap-northeast-1:{}:db:{}", ACCOUNT_ID, identifier),
        status: LifecycleStatus::from(status),
        tags: tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// Instance tagged `AutoSchedule=true`
pub fn scheduled_instance(identifier: &str, status: &str) -> ManagedResource {
    resource(ResourceKind::Instance, identifier, status, &[("AutoSchedule", "true")])
}

/// Cluster tagged `AutoSchedule=true`
pub fn scheduled_cluster(identifier: &str, status: &str) -> ManagedResource {
    resource(ResourceKind::Cluster, identifier, status, &[("AutoSchedule", "true")])
}

pub fn snapshot(
    kind: ResourceKind,
    identifier: &str,
    age_days: i64,
    now: DateTime<Utc>,
    size_gb: Option<i32>,
) -> Snapshot {
    Snapshot {
        kind,
        identifier: identifier.to_string(),
        created_at: Some(now - Duration::days(age_days)),
        allocated_storage_gb: size_gb,
    }
}

/// Secret store over a fixed map; counts lookups
#[derive(Default)]
pub struct StaticSecrets {
    secrets: HashMap<String, String>,
    lookups: AtomicUsize,
}

impl StaticSecrets {
    pub fn with_token(name: &str, token: &str) -> Self {
        let mut secrets = HashMap::new();
        secrets.insert(
            name.to_string(),
            serde_json::json!({ "ASANA_TOKEN": token }).to_string(),
        );
        Self {
            secrets,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretStore for StaticSecrets {
    async fn secret_string(&self, name: &str) -> Result<String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("ResourceNotFoundException: secret {} not found", name))
    }
}

pub struct StaticIdentity(pub &'static str);

#[async_trait]
impl AccountIdentity for StaticIdentity {
    async fn account_id(&self) -> Result<String> {
        Ok(self.0.to_string())
    }
}

/// Resolver over a calendar URL and a custom CSV path
pub fn resolver(calendar_url: &str, custom_path: &Path) -> HolidayResolver {
    let official =
        OfficialCalendar::new(calendar_url.to_string(), std::time::Duration::from_secs(2)).unwrap();
    HolidayResolver::new(official, CustomHolidays::new(custom_path))
}
