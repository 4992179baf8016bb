//! Business-day start/stop scheduling
//!
//! [`ScheduleHandler`] is the single entry point for one start/stop run,
//! whichever trigger invoked it (cron, HTTP or the CLI). [`OpsScheduler`]
//! registers the in-process cron triggers.
//!
//! # Configuration
//!
//! Schedules use 6-field cron expressions (sec min hour day month dow),
//! evaluated in Asia/Tokyo:
//!
//! ```toml
//! [schedule]
//! start_cron = "0 0 8 * * Mon-Fri"   # 08:00 JST on weekdays
//! stop_cron = "0 0 21 * * Mon-Fri"   # 21:00 JST on weekdays
//!
//! [snapshot_report]
//! enabled = true
//! cron = "0 0 10 * * Mon"
//! ```

pub mod handler;
pub mod operations;

pub use handler::ScheduleHandler;
pub use operations::OpsScheduler;

use serde::{Deserialize, Serialize};

/// Trigger payload, e.g. `{"action": "start"}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleRequest {
    #[serde(default)]
    pub action: Option<String>,
}

impl ScheduleRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
        }
    }
}

/// Structured result of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl ScheduleOutcome {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    pub fn bad_request(body: impl Into<String>) -> Self {
        Self {
            status_code: 400,
            body: body.into(),
        }
    }

    pub fn internal_error(body: impl Into<String>) -> Self {
        Self {
            status_code: 500,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_wire_format() {
        let json = serde_json::to_value(ScheduleOutcome::ok("Action start completed")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"statusCode": 200, "body": "Action start completed"})
        );
    }

    #[test]
    fn test_request_without_action() {
        let request: ScheduleRequest = serde_json::from_str("{}").unwrap();
        assert!(request.action.is_none());

        let request: ScheduleRequest = serde_json::from_str(r#"{"action": "stop"}"#).unwrap();
        assert_eq!(request.action.as_deref(), Some("stop"));
    }
}
