use anyhow::Result;
use chrono::Datelike;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::{ScheduleOutcome, ScheduleRequest};
use crate::clock::{business_date, is_weekend, Clock};
use crate::holidays::HolidayResolver;
use crate::rds::ResourceKind;
use crate::services::{Action, LifecycleService};

const MISSING_ACTION: &str = "Missing action parameter";

pub struct ScheduleHandler {
    resolver: Arc<HolidayResolver>,
    lifecycle: Arc<LifecycleService>,
    clock: Arc<dyn Clock>,
    skip_weekends: bool,
}

impl ScheduleHandler {
    pub fn new(
        resolver: Arc<HolidayResolver>,
        lifecycle: Arc<LifecycleService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resolver,
            lifecycle,
            clock,
            skip_weekends: false,
        }
    }

    pub fn with_weekend_skip(mut self, skip_weekends: bool) -> Self {
        self.skip_weekends = skip_weekends;
        self
    }

    /// Runs one start/stop invocation. Always returns an outcome: failures
    /// and panics inside the run become a 500.
    #[instrument(skip_all, fields(run_id = %Uuid::new_v4()))]
    pub async fn handle(&self, request: &ScheduleRequest) -> ScheduleOutcome {
        let action = match request.action.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Action::parse(raw),
            _ => {
                warn!("{}", MISSING_ACTION);
                return ScheduleOutcome::bad_request(MISSING_ACTION);
            }
        };

        match AssertUnwindSafe(self.run(&action)).catch_unwind().await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                error!("Scheduled execution failed: {:#}", e);
                ScheduleOutcome::internal_error(format!("Error: {:#}", e))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!("Scheduled execution panicked: {}", message);
                ScheduleOutcome::internal_error(format!("Error: {}", message))
            }
        }
    }

    async fn run(&self, action: &Action) -> Result<ScheduleOutcome> {
        let today = business_date(self.clock.now());

        let holidays = self.resolver.resolve(today.year()).await;
        if let Some(kind) = holidays.classify(today) {
            info!(
                "Today is a {} holiday ({}). Skipping action.",
                kind.label(),
                today
            );
            return Ok(ScheduleOutcome::ok(format!(
                "{} holiday - no action taken",
                kind.title()
            )));
        }

        if self.skip_weekends && is_weekend(today) {
            info!("Today is a weekend day ({}). Skipping action.", today);
            return Ok(ScheduleOutcome::ok("Weekend - no action taken"));
        }

        if let Action::Other(raw) = action {
            warn!(
                "Unrecognized action '{}', no resource will change state",
                raw
            );
        }

        let mut report = self.lifecycle.apply(action, ResourceKind::Instance).await?;
        report.merge(self.lifecycle.apply(action, ResourceKind::Cluster).await?);

        info!(
            "Action {} finished on {}: {} started, {} stopped, {} failed",
            action,
            today,
            report.started.len(),
            report.stopped.len(),
            report.failed.len()
        );

        if report.failed.is_empty() {
            return Ok(ScheduleOutcome::ok(format!("Action {} completed", action)));
        }

        let failed = report
            .failed
            .iter()
            .map(|f| f.identifier.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        warn!("Action {} completed with failures: {}", action, failed);

        Ok(ScheduleOutcome::ok(format!(
            "Action {} completed with {} failure(s): {}",
            action,
            report.failed.len(),
            failed
        )))
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected panic".to_string()
    }
}
