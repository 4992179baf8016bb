// File: rds-ops/src/scheduler/operations.rs
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, instrument, warn};

use super::{ScheduleHandler, ScheduleRequest};
use crate::config::Config;
use crate::constants::time::BUSINESS_TIMEZONE;
use crate::services::{Action, SnapshotReportJob};

const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const WEEKDAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Registers the start/stop and snapshot report triggers on an in-process
/// cron scheduler. Every trigger fires in Asia/Tokyo.
pub struct OpsScheduler {
    config: Arc<Config>,
    handler: Arc<ScheduleHandler>,
    report_job: Option<Arc<SnapshotReportJob>>,
    scheduler: JobScheduler,
}

impl OpsScheduler {
    pub async fn new(
        config: Arc<Config>,
        handler: Arc<ScheduleHandler>,
        report_job: Option<Arc<SnapshotReportJob>>,
    ) -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| anyhow!("Failed to create JobScheduler: {}", e))?;

        Ok(Self {
            config,
            handler,
            report_job,
            scheduler,
        })
    }

    /// Schedules every enabled trigger and starts the scheduler. Returns the
    /// number of registered jobs; a trigger with a bad cron expression is
    /// logged and left out.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<usize> {
        info!("Starting ops scheduler with 6-field cron format (sec min hour day month dow), timezone {}", BUSINESS_TIMEZONE);
        let mut scheduled_count = 0;

        let schedule = &self.config.schedule;
        if schedule.enabled {
            for (action, cron) in [
                (Action::Start, &schedule.start_cron),
                (Action::Stop, &schedule.stop_cron),
            ] {
                match self.schedule_lifecycle_job(action.clone(), cron).await {
                    Ok(_) => {
                        scheduled_count += 1;
                        info!("✓ Scheduled {} for all eligible databases: {}", action, cron);
                    }
                    Err(e) => {
                        error!("✗ Failed to schedule {}: {} (schedule: {})", action, e, cron);
                    }
                }
            }
        } else {
            info!("Start/stop schedule disabled, skipping");
        }

        match (&self.report_job, self.config.snapshot_report.enabled) {
            (Some(job), true) => {
                let cron = &self.config.snapshot_report.cron;
                match self.schedule_report_job(job.clone(), cron).await {
                    Ok(_) => {
                        scheduled_count += 1;
                        info!("✓ Scheduled snapshot report: {}", cron);
                    }
                    Err(e) => {
                        error!("✗ Failed to schedule snapshot report: {} (schedule: {})", e, cron);
                    }
                }
            }
            (None, true) => warn!("Snapshot report enabled but not configured, skipping schedule"),
            _ => info!("Snapshot report disabled, skipping schedule"),
        }

        if scheduled_count > 0 {
            self.scheduler
                .start()
                .await
                .map_err(|e| anyhow!("Failed to start scheduler: {}", e))?;
            info!("✓ Ops scheduler started successfully with {} jobs", scheduled_count);
        } else {
            warn!("No scheduled jobs configured - scheduler not started");
        }

        Ok(scheduled_count)
    }

    async fn schedule_lifecycle_job(&self, action: Action, schedule: &str) -> Result<()> {
        validate_6_field_cron(schedule)
            .map_err(|e| anyhow!("Invalid 6-field cron schedule '{}': {}", schedule, e))?;

        let handler = self.handler.clone();

        let job = Job::new_async_tz(schedule, BUSINESS_TIMEZONE, move |_uuid, _scheduler| {
            let handler = handler.clone();
            let request = ScheduleRequest::new(action.as_str());

            Box::pin(async move {
                info!("⏰ Executing scheduled {}", request.action.as_deref().unwrap_or_default());
                let outcome = handler.handle(&request).await;
                if outcome.is_success() {
                    info!("✓ Scheduled run finished: {}", outcome.body);
                } else {
                    error!("✗ Scheduled run failed ({}): {}", outcome.status_code, outcome.body);
                }
            })
        })
        .map_err(|e| anyhow!("Failed to create lifecycle job for '{}': {}", schedule, e))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| anyhow!("Failed to add lifecycle job to scheduler: {}", e))?;

        Ok(())
    }

    async fn schedule_report_job(&self, report_job: Arc<SnapshotReportJob>, schedule: &str) -> Result<()> {
        validate_6_field_cron(schedule)
            .map_err(|e| anyhow!("Invalid 6-field cron schedule '{}': {}", schedule, e))?;

        let job = Job::new_async_tz(schedule, BUSINESS_TIMEZONE, move |_uuid, _scheduler| {
            let report_job = report_job.clone();

            Box::pin(async move {
                info!("📸 Executing scheduled snapshot report");
                match report_job.run().await {
                    Ok(summary) => info!(
                        "✓ Snapshot report finished: {} snapshot(s), task created: {}",
                        summary.snapshot_count, summary.task_created
                    ),
                    Err(e) => error!("✗ Snapshot report failed: {:#}", e),
                }
            })
        })
        .map_err(|e| anyhow!("Failed to create snapshot report job for '{}': {}", schedule, e))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| anyhow!("Failed to add snapshot report job to scheduler: {}", e))?;

        Ok(())
    }
}

pub fn validate_6_field_cron(schedule: &str) -> Result<()> {
    let parts: Vec<&str> = schedule.split_whitespace().collect();

    if parts.len() != 6 {
        return Err(anyhow!("tokio-cron-scheduler requires exactly 6 fields: second minute hour day month dayofweek. Got {} fields: '{}'", parts.len(), schedule));
    }

    validate_cron_field(parts[0], "second", 0, 59, &[])?;
    validate_cron_field(parts[1], "minute", 0, 59, &[])?;
    validate_cron_field(parts[2], "hour", 0, 23, &[])?;
    validate_cron_field(parts[3], "day", 1, 31, &[])?;
    validate_cron_field(parts[4], "month", 1, 12, &MONTH_NAMES)?;
    validate_cron_field(parts[5], "dayofweek", 0, 7, &WEEKDAY_NAMES)?;

    Ok(())
}

/// Accepts `*`, `?`, single values, ranges, comma lists and `/` steps.
/// `names` are matched case-insensitively and count as values.
fn validate_cron_field(field: &str, name: &str, min: u32, max: u32, names: &[&str]) -> Result<()> {
    for part in field.split(',') {
        let (base, step) = match part.split_once('/') {
            Some((base, step)) => (base, Some(step)),
            None => (part, None),
        };

        if let Some(step) = step {
            let step = step
                .parse::<u32>()
                .map_err(|_| anyhow!("Invalid {} step value: {}", name, step))?;
            if step == 0 {
                return Err(anyhow!("{} step value cannot be 0", name));
            }
        }

        if base == "*" || base == "?" {
            continue;
        }

        match base.split_once('-') {
            Some((start, end)) => {
                let start = field_value(start, name, min, max, names)?;
                let end = field_value(end, name, min, max, names)?;
                if start > end {
                    return Err(anyhow!("{} range {}-{} is reversed", name, start, end));
                }
            }
            None => {
                field_value(base, name, min, max, names)?;
            }
        }
    }

    Ok(())
}

fn field_value(raw: &str, name: &str, min: u32, max: u32, names: &[&str]) -> Result<u32> {
    if let Some(position) = names.iter().position(|n| n.eq_ignore_ascii_case(raw)) {
        return Ok(position as u32 + min);
    }

    let value = raw
        .parse::<u32>()
        .map_err(|_| anyhow!("Invalid {} value: {}", name, raw))?;

    if value < min || value > max {
        return Err(anyhow!("{} value {} is outside valid range {}-{}", name, value, min, max));
    }

    Ok(value)
}
