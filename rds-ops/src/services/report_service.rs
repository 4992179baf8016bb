// File: rds-ops/src/services/report_service.rs
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::http;
use crate::errors::ReportError;
use crate::services::snapshot_service::SnapshotEntry;

/// Body of a task creation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRequest {
    pub data: TaskData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskData {
    pub name: String,
    pub html_notes: String,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublishedTask {
    pub status: u16,
    pub gid: Option<String>,
}

/// Files snapshot cleanup reports as tasks in the project tracker
pub struct ReportService {
    api_base_url: String,
    client: Client,
}

impl ReportService {
    pub fn new(api_base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(http::REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client for ReportService")?;

        Ok(Self {
            api_base_url,
            client,
        })
    }

    pub fn build_task(
        entries: &[SnapshotEntry],
        age_days: u32,
        project_id: &str,
        account_id: &str,
    ) -> TaskRequest {
        let header = format!(
            "Here is the list of RDS snapshots older than {} days. Please delete any that are no longer needed.",
            age_days
        );
        let account_line = format!("<h2>AWS Account: {}</h2>", account_id);
        let snapshot_lines = entries
            .iter()
            .map(SnapshotEntry::report_line)
            .collect::<Vec<_>>()
            .join("\n");

        TaskRequest {
            data: TaskData {
                name: format!("RDS Snapshots Report (>{} days)", age_days),
                html_notes: format!(
                    "<body>{}\n\n{}{}</body>",
                    header, account_line, snapshot_lines
                ),
                projects: vec![project_id.to_string()],
            },
        }
    }

    /// Creates one task listing `entries`. Nothing is sent when `entries` is
    /// empty. Transport errors and non-success statuses are returned as-is.
    pub async fn publish(
        &self,
        entries: &[SnapshotEntry],
        age_days: u32,
        project_id: &str,
        token: &str,
        account_id: &str,
    ) -> Result<Option<PublishedTask>> {
        if entries.is_empty() {
            debug!("No snapshots to report, skipping task creation");
            return Ok(None);
        }

        let task = Self::build_task(entries, age_days, project_id, account_id);
        let url = format!("{}/tasks", self.api_base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&task)
            .send()
            .await
            .with_context(|| format!("Failed to reach task API at {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::Rejected {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let gid = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v["data"]["gid"].as_str().map(str::to_string));

        info!("Asana task created: {}", status);

        Ok(Some(PublishedTask {
            status: status.as_u16(),
            gid,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rds::ResourceKind;

    #[test]
    fn test_build_task_layout() {
        let entries = vec![
            SnapshotEntry {
                identifier: "db-1-manual".to_string(),
                size_gb: Some(100),
                created_at: "Jan 05, 2025, 18:30".to_string(),
                kind: ResourceKind::Instance,
            },
            SnapshotEntry {
                identifier: "cluster-1-manual".to_string(),
                size_gb: None,
                created_at: "Jan 06, 2025, 09:00".to_string(),
                kind: ResourceKind::Cluster,
            },
        ];

        let task = ReportService::build_task(&entries, 30, "1200000000000001", "123456789012");

        assert_eq!(task.data.name, "RDS Snapshots Report (>30 days)");
        assert_eq!(task.data.projects, vec!["1200000000000001"]);
        assert_eq!(
            task.data.html_notes,
            "<body>Here is the list of RDS snapshots older than 30 days. Please delete any that are no longer needed.\n\n\
             <h2>AWS Account: 123456789012</h2>\
             db-1-manual / 100 GB / Jan 05, 2025, 18:30 (UTC+09:00)\n\
             cluster-1-manual / N/A GB / Jan 06, 2025, 09:00 (UTC+09:00)</body>"
        );
    }
}
