//! Managed database resources and the API seam used to read and act on them
//!
//! Instances and clusters are modelled as one [`ManagedResource`] type
//! distinguished by [`ResourceKind`], so the lifecycle and snapshot logic is
//! written once. [`DatabaseApi`] is the only way the rest of the crate talks
//! to the database service; [`aws::AwsRdsClient`] is the production
//! implementation.

pub mod aws;

pub use aws::{AwsAccountIdentity, AwsRdsClient};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::constants::tags::{AUTO_SCHEDULE_KEY, AUTO_SCHEDULE_VALUE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Instance,
    Cluster,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Instance, ResourceKind::Cluster];

    /// Name used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Instance => "RDS instance",
            ResourceKind::Cluster => "Aurora cluster",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Instance => write!(f, "instance"),
            ResourceKind::Cluster => write!(f, "cluster"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleStatus {
    Available,
    Stopped,
    Starting,
    Stopping,
    Other(String),
}

impl From<&str> for LifecycleStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "available" => LifecycleStatus::Available,
            "stopped" => LifecycleStatus::Stopped,
            "starting" => LifecycleStatus::Starting,
            "stopping" => LifecycleStatus::Stopping,
            other => LifecycleStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleStatus::Available => write!(f, "available"),
            LifecycleStatus::Stopped => write!(f, "stopped"),
            LifecycleStatus::Starting => write!(f, "starting"),
            LifecycleStatus::Stopping => write!(f, "stopping"),
            LifecycleStatus::Other(raw) => write!(f, "{}", raw),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ManagedResource {
    pub kind: ResourceKind,
    pub identifier: String,
    pub arn: String,
    pub status: LifecycleStatus,
    pub tags: HashMap<String, String>,
}

/// Only resources tagged exactly `AutoSchedule=true` are ever started or stopped
pub fn is_eligible(resource: &ManagedResource) -> bool {
    resource
        .tags
        .get(AUTO_SCHEDULE_KEY)
        .is_some_and(|value| value == AUTO_SCHEDULE_VALUE)
}

/// Manual snapshot of an instance or cluster
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub kind: ResourceKind,
    pub identifier: String,
    /// Absent while the snapshot is still being created
    pub created_at: Option<DateTime<Utc>>,
    pub allocated_storage_gb: Option<i32>,
}

#[async_trait]
pub trait DatabaseApi: Send + Sync {
    async fn list_resources(&self, kind: ResourceKind) -> Result<Vec<ManagedResource>>;

    async fn start_resource(&self, kind: ResourceKind, identifier: &str) -> Result<()>;

    async fn stop_resource(&self, kind: ResourceKind, identifier: &str) -> Result<()>;

    async fn list_manual_snapshots(&self, kind: ResourceKind) -> Result<Vec<Snapshot>>;
}

#[async_trait]
pub trait AccountIdentity: Send + Sync {
    async fn account_id(&self) -> Result<String>;
}
