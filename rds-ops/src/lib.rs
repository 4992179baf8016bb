pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod holidays;
pub mod rds;
pub mod scheduler;
pub mod services;
pub mod web;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use config::{Config, ConfigManager, SecretStore};
pub use errors::OpsError;
pub use holidays::{HolidayResolver, HolidaySet};
pub use rds::{AccountIdentity, DatabaseApi, ResourceKind};
pub use scheduler::{OpsScheduler, ScheduleHandler, ScheduleOutcome, ScheduleRequest};
pub use services::{Action, LifecycleService, SnapshotReportJob};
