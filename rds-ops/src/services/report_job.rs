// File: rds-ops/src/services/report_job.rs
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::secrets::resolve_token;
use crate::config::{SecretStore, SnapshotReportSettings};
use crate::rds::AccountIdentity;
use crate::services::{ReportService, SnapshotService};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SnapshotReportSummary {
    pub snapshot_count: usize,
    pub task_created: bool,
    pub task_gid: Option<String>,
}

/// One run of the old-snapshot report: token, scan, publish.
///
/// Errors are returned to the caller unchanged; the job never retries.
pub struct SnapshotReportJob {
    settings: SnapshotReportSettings,
    secrets: Arc<dyn SecretStore>,
    identity: Arc<dyn AccountIdentity>,
    scanner: Arc<SnapshotService>,
    publisher: Arc<ReportService>,
}

impl SnapshotReportJob {
    pub fn new(
        settings: SnapshotReportSettings,
        secrets: Arc<dyn SecretStore>,
        identity: Arc<dyn AccountIdentity>,
        scanner: Arc<SnapshotService>,
        publisher: Arc<ReportService>,
    ) -> Self {
        Self {
            settings,
            secrets,
            identity,
            scanner,
            publisher,
        }
    }

    #[instrument(skip(self), fields(age_days = self.settings.age_days))]
    pub async fn run(&self) -> Result<SnapshotReportSummary> {
        let token = resolve_token(
            self.secrets.as_ref(),
            &self.settings.secret_name,
            &self.settings.secret_key,
        )
        .await?;

        let entries = self.scanner.scan(self.settings.age_days).await?;
        if entries.is_empty() {
            info!("No outdated snapshots found.");
            return Ok(SnapshotReportSummary {
                snapshot_count: 0,
                task_created: false,
                task_gid: None,
            });
        }

        let account_id = self.identity.account_id().await?;

        let published = self
            .publisher
            .publish(
                &entries,
                self.settings.age_days,
                &self.settings.project_id,
                &token,
                &account_id,
            )
            .await?;

        Ok(SnapshotReportSummary {
            snapshot_count: entries.len(),
            task_created: published.is_some(),
            task_gid: published.and_then(|task| task.gid),
        })
    }
}
