// File: rds-ops/src/services/mod.rs

pub mod lifecycle_service;
pub mod report_job;
pub mod report_service;
pub mod snapshot_service;

pub use lifecycle_service::{Action, LifecycleReport, LifecycleService, ResourceFailure};
pub use report_job::{SnapshotReportJob, SnapshotReportSummary};
pub use report_service::{PublishedTask, ReportService, TaskRequest};
pub use snapshot_service::{SnapshotEntry, SnapshotService};
