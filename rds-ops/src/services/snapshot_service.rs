// File: rds-ops/src/services/snapshot_service.rs
use anyhow::{anyhow, Context, Result};
use chrono::Duration;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::clock::{format_jst, Clock};
use crate::constants::time::BUSINESS_TIMEZONE_LABEL;
use crate::rds::{DatabaseApi, ResourceKind};

/// A manual snapshot past the age threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
    pub identifier: String,
    pub size_gb: Option<i32>,
    /// JST, e.g. `Jan 05, 2025, 18:30`
    pub created_at: String,
    pub kind: ResourceKind,
}

impl SnapshotEntry {
    /// `id / 20 GB / Jan 05, 2025, 18:30 (UTC+09:00)`
    pub fn report_line(&self) -> String {
        let size = self
            .size_gb
            .map(|gb| gb.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        format!(
            "{} / {} GB / {} ({})",
            self.identifier, size, self.created_at, BUSINESS_TIMEZONE_LABEL
        )
    }
}

#[derive(Clone)]
pub struct SnapshotService {
    database: Arc<dyn DatabaseApi>,
    clock: Arc<dyn Clock>,
}

impl SnapshotService {
    pub fn new(database: Arc<dyn DatabaseApi>, clock: Arc<dyn Clock>) -> Self {
        Self { database, clock }
    }

    /// Manual snapshots of both kinds created more than `age_days` ago,
    /// instance snapshots first
    pub async fn scan(&self, age_days: u32) -> Result<Vec<SnapshotEntry>> {
        let now = self.clock.now();
        let cutoff = now
            .checked_sub_signed(Duration::days(i64::from(age_days)))
            .ok_or_else(|| anyhow!("Age threshold of {} days reaches before {}", age_days, now))?;
        let mut entries = Vec::new();

        for kind in ResourceKind::ALL {
            let snapshots = self
                .database
                .list_manual_snapshots(kind)
                .await
                .with_context(|| format!("Failed to list manual {} snapshots", kind))?;

            for snapshot in snapshots {
                let Some(created_at) = snapshot.created_at else {
                    debug!("Snapshot {} has no creation time yet, skipping", snapshot.identifier);
                    continue;
                };

                if created_at < cutoff {
                    entries.push(SnapshotEntry {
                        identifier: snapshot.identifier,
                        size_gb: snapshot.allocated_storage_gb,
                        created_at: format_jst(created_at),
                        kind,
                    });
                }
            }
        }

        info!(
            "Found {} manual snapshots older than {} days",
            entries.len(),
            age_days
        );
        Ok(entries)
    }
}
