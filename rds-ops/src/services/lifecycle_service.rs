// File: rds-ops/src/services/lifecycle_service.rs
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

use crate::errors::ResourceError;
use crate::rds::{is_eligible, DatabaseApi, LifecycleStatus, ResourceKind};

/// Requested lifecycle action. Anything other than `start`/`stop` is carried
/// through as `Other` and never matches a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
    Other(String),
}

impl Action {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "start" => Action::Start,
            "stop" => Action::Stop,
            other => Action::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Stop,
}

impl Command {
    fn as_str(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Stop => "stop",
        }
    }
}

/// Only `stopped -> start` and `available -> stop` issue a command
fn decide(action: &Action, status: &LifecycleStatus) -> Option<Command> {
    match (action, status) {
        (Action::Start, LifecycleStatus::Stopped) => Some(Command::Start),
        (Action::Stop, LifecycleStatus::Available) => Some(Command::Stop),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceFailure {
    pub kind: ResourceKind,
    pub identifier: String,
    pub reason: String,
}

/// What happened to each resource during one `apply`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LifecycleReport {
    pub started: Vec<String>,
    pub stopped: Vec<String>,
    pub unchanged: Vec<String>,
    pub ineligible: Vec<String>,
    pub failed: Vec<ResourceFailure>,
}

impl LifecycleReport {
    pub fn merge(&mut self, other: LifecycleReport) {
        self.started.extend(other.started);
        self.stopped.extend(other.stopped);
        self.unchanged.extend(other.unchanged);
        self.ineligible.extend(other.ineligible);
        self.failed.extend(other.failed);
    }

    /// Commands that were attempted, successful or not
    pub fn commands_issued(&self) -> usize {
        self.started.len() + self.stopped.len() + self.failed.len()
    }
}

pub struct LifecycleService {
    database: Arc<dyn DatabaseApi>,
}

impl LifecycleService {
    pub fn new(database: Arc<dyn DatabaseApi>) -> Self {
        Self { database }
    }

    /// Applies `action` to every eligible resource of `kind`.
    ///
    /// A failed start/stop is recorded in the report and processing moves on;
    /// only a failed listing call returns an error.
    #[instrument(skip_all, fields(action = %action, kind = %kind))]
    pub async fn apply(&self, action: &Action, kind: ResourceKind) -> Result<LifecycleReport> {
        let resources = self
            .database
            .list_resources(kind)
            .await
            .map_err(|e| {
                error!("Error processing {}s: {:#}", kind.label(), e);
                e
            })
            .with_context(|| format!("Error processing {}s", kind.label()))?;

        let mut report = LifecycleReport::default();

        for resource in resources {
            if !is_eligible(&resource) {
                debug!(
                    "Skipping {} {}: not tagged for auto scheduling",
                    kind.label(),
                    resource.identifier
                );
                report.ineligible.push(resource.identifier);
                continue;
            }

            let id = resource.identifier;

            let Some(command) = decide(action, &resource.status) else {
                debug!(
                    "{} {} is {}, nothing to do for '{}'",
                    kind.label(),
                    id,
                    resource.status,
                    action
                );
                report.unchanged.push(id);
                continue;
            };

            let result = match command {
                Command::Start => self.database.start_resource(kind, &id).await,
                Command::Stop => self.database.stop_resource(kind, &id).await,
            };

            match (command, result) {
                (Command::Start, Ok(())) => {
                    info!("Started {}: {}", kind.label(), id);
                    report.started.push(id);
                }
                (Command::Stop, Ok(())) => {
                    info!("Stopped {}: {}", kind.label(), id);
                    report.stopped.push(id);
                }
                (command, Err(e)) => {
                    let reason = format!("{:#}", e);
                    let failure = ResourceError::ActionFailed {
                        identifier: id.clone(),
                        action: command.as_str().to_string(),
                        reason: reason.clone(),
                    };
                    error!("{}: {}", kind.label(), failure);
                    report.failed.push(ResourceFailure {
                        kind,
                        identifier: id,
                        reason,
                    });
                }
            }
        }

        info!(
            started = report.started.len(),
            stopped = report.stopped.len(),
            unchanged = report.unchanged.len(),
            ineligible = report.ineligible.len(),
            failed = report.failed.len(),
            "Processed {}s",
            kind.label()
        );

        Ok(report)
    }
}
