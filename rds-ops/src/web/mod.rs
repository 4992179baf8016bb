// File: rds-ops/src/web/mod.rs
pub mod handlers;
pub mod middleware;
pub mod server;

pub use middleware::ApiKeyAuth;
pub use server::{create_router, start_web_server};

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::config::Config;
use crate::holidays::{CalendarDay, HolidayResolver};
use crate::scheduler::ScheduleHandler;
use crate::services::SnapshotReportJob;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub schedule_handler: Arc<ScheduleHandler>,
    // None when the snapshot report settings are incomplete
    pub report_job: Option<Arc<SnapshotReportJob>>,
    pub resolver: Arc<HolidayResolver>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        schedule_handler: Arc<ScheduleHandler>,
        report_job: Option<Arc<SnapshotReportJob>>,
        resolver: Arc<HolidayResolver>,
    ) -> Self {
        Self {
            config,
            schedule_handler,
            report_job,
            resolver,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HolidayCalendar {
    pub year: i32,
    pub official: BTreeSet<NaiveDate>,
    pub custom: BTreeSet<NaiveDate>,
    pub business_days: usize,
    pub days: Vec<CalendarDay>,
}
