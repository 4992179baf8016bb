use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_rds::primitives::DateTime as AwsDateTime;
use aws_sdk_rds::types::Tag;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use super::{AccountIdentity, DatabaseApi, LifecycleStatus, ManagedResource, ResourceKind, Snapshot};
use crate::errors::{ReportError, ResourceError};

const MANUAL_SNAPSHOT_TYPE: &str = "manual";

pub struct AwsRdsClient {
    client: aws_sdk_rds::Client,
}

impl AwsRdsClient {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_rds::Client::new(sdk_config),
        }
    }

    async fn list_instances(&self) -> Result<Vec<ManagedResource>> {
        let mut resources = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self
                .client
                .describe_db_instances()
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| list_failed(ResourceKind::Instance, e.into_service_error()))?;

            for instance in page.db_instances() {
                let Some(identifier) = instance.db_instance_identifier() else {
                    continue;
                };
                resources.push(ManagedResource {
                    kind: ResourceKind::Instance,
                    identifier: identifier.to_string(),
                    arn: instance.db_instance_arn().unwrap_or_default().to_string(),
                    status: LifecycleStatus::from(instance.db_instance_status().unwrap_or_default()),
                    tags: tag_map(instance.tag_list()),
                });
            }

            match page.marker() {
                Some(next) => marker = Some(next.to_string()),
                None => break,
            }
        }

        Ok(resources)
    }

    async fn list_clusters(&self) -> Result<Vec<ManagedResource>> {
        let mut resources = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self
                .client
                .describe_db_clusters()
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| list_failed(ResourceKind::Cluster, e.into_service_error()))?;

            for cluster in page.db_clusters() {
                let Some(identifier) = cluster.db_cluster_identifier() else {
                    continue;
                };
                resources.push(ManagedResource {
                    kind: ResourceKind::Cluster,
                    identifier: identifier.to_string(),
                    arn: cluster.db_cluster_arn().unwrap_or_default().to_string(),
                    status: LifecycleStatus::from(cluster.status().unwrap_or_default()),
                    tags: tag_map(cluster.tag_list()),
                });
            }

            match page.marker() {
                Some(next) => marker = Some(next.to_string()),
                None => break,
            }
        }

        Ok(resources)
    }

    async fn list_instance_snapshots(&self) -> Result<Vec<Snapshot>> {
        let mut snapshots = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self
                .client
                .describe_db_snapshots()
                .snapshot_type(MANUAL_SNAPSHOT_TYPE)
                .set_marker(marker.take())
                .send()
                .await
                .context("DescribeDBSnapshots failed")?;

            for snapshot in page.db_snapshots() {
                let Some(identifier) = snapshot.db_snapshot_identifier() else {
                    continue;
                };
                snapshots.push(Snapshot {
                    kind: ResourceKind::Instance,
                    identifier: identifier.to_string(),
                    created_at: snapshot.snapshot_create_time().and_then(to_utc),
                    allocated_storage_gb: snapshot.allocated_storage(),
                });
            }

            match page.marker() {
                Some(next) => marker = Some(next.to_string()),
                None => break,
            }
        }

        Ok(snapshots)
    }

    async fn list_cluster_snapshots(&self) -> Result<Vec<Snapshot>> {
        let mut snapshots = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self
                .client
                .describe_db_cluster_snapshots()
                .snapshot_type(MANUAL_SNAPSHOT_TYPE)
                .set_marker(marker.take())
                .send()
                .await
                .context("DescribeDBClusterSnapshots failed")?;

            for snapshot in page.db_cluster_snapshots() {
                let Some(identifier) = snapshot.db_cluster_snapshot_identifier() else {
                    continue;
                };
                snapshots.push(Snapshot {
                    kind: ResourceKind::Cluster,
                    identifier: identifier.to_string(),
                    created_at: snapshot.snapshot_create_time().and_then(to_utc),
                    allocated_storage_gb: snapshot.allocated_storage(),
                });
            }

            match page.marker() {
                Some(next) => marker = Some(next.to_string()),
                None => break,
            }
        }

        Ok(snapshots)
    }
}

#[async_trait]
impl DatabaseApi for AwsRdsClient {
    async fn list_resources(&self, kind: ResourceKind) -> Result<Vec<ManagedResource>> {
        let resources = match kind {
            ResourceKind::Instance => self.list_instances().await?,
            ResourceKind::Cluster => self.list_clusters().await?,
        };
        debug!("Listed {} {}s", resources.len(), kind);
        Ok(resources)
    }

    async fn start_resource(&self, kind: ResourceKind, identifier: &str) -> Result<()> {
        let result = match kind {
            ResourceKind::Instance => self
                .client
                .start_db_instance()
                .db_instance_identifier(identifier)
                .send()
                .await
                .map(|_| ())
                .map_err(|e| e.into_service_error().to_string()),
            ResourceKind::Cluster => self
                .client
                .start_db_cluster()
                .db_cluster_identifier(identifier)
                .send()
                .await
                .map(|_| ())
                .map_err(|e| e.into_service_error().to_string()),
        };

        result.map_err(|reason| action_failed(identifier, "start", reason))
    }

    async fn stop_resource(&self, kind: ResourceKind, identifier: &str) -> Result<()> {
        let result = match kind {
            ResourceKind::Instance => self
                .client
                .stop_db_instance()
                .db_instance_identifier(identifier)
                .send()
                .await
                .map(|_| ())
                .map_err(|e| e.into_service_error().to_string()),
            ResourceKind::Cluster => self
                .client
                .stop_db_cluster()
                .db_cluster_identifier(identifier)
                .send()
                .await
                .map(|_| ())
                .map_err(|e| e.into_service_error().to_string()),
        };

        result.map_err(|reason| action_failed(identifier, "stop", reason))
    }

    async fn list_manual_snapshots(&self, kind: ResourceKind) -> Result<Vec<Snapshot>> {
        match kind {
            ResourceKind::Instance => self.list_instance_snapshots().await,
            ResourceKind::Cluster => self.list_cluster_snapshots().await,
        }
    }
}

pub struct AwsAccountIdentity {
    client: aws_sdk_sts::Client,
}

impl AwsAccountIdentity {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_sts::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl AccountIdentity for AwsAccountIdentity {
    async fn account_id(&self) -> Result<String> {
        let output = self
            .client
            .get_caller_identity()
            .send()
            .await
            .context("GetCallerIdentity failed")?;

        output
            .account()
            .map(str::to_string)
            .ok_or_else(|| ReportError::AccountUnknown.into())
    }
}

fn tag_map(tags: &[Tag]) -> HashMap<String, String> {
    tags.iter()
        .filter_map(|tag| Some((tag.key()?.to_string(), tag.value()?.to_string())))
        .collect()
}

fn to_utc(timestamp: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.secs(), timestamp.subsec_nanos())
}

fn list_failed(kind: ResourceKind, err: impl std::error::Error) -> anyhow::Error {
    ResourceError::ListFailed {
        kind: kind.to_string(),
        reason: err.to_string(),
    }
    .into()
}

fn action_failed(identifier: &str, action: &str, reason: String) -> anyhow::Error {
    ResourceError::ActionFailed {
        identifier: identifier.to_string(),
        action: action.to_string(),
        reason,
    }
    .into()
}
