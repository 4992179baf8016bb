//! In-memory stand-in for the RDS API
//!
//! Serves canned resources and snapshots and records every start/stop
//! command so tests can assert on exactly what would have been sent.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;

use rds_ops::rds::{DatabaseApi, ManagedResource, ResourceKind, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuedCommand {
    Start(ResourceKind, String),
    Stop(ResourceKind, String),
}

#[derive(Default)]
pub struct FakeDatabase {
    resources: Vec<ManagedResource>,
    snapshots: Vec<Snapshot>,
    failing_ids: HashSet<String>,
    failing_listings: HashSet<ResourceKind>,
    panic_on_listing: bool,
    commands: Mutex<Vec<IssuedCommand>>,
    listing_calls: Mutex<usize>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resources(mut self, resources: Vec<ManagedResource>) -> Self {
        self.resources.extend(resources);
        self
    }

    pub fn with_snapshots(mut self, snapshots: Vec<Snapshot>) -> Self {
        self.snapshots.extend(snapshots);
        self
    }

    /// Start/stop of `identifier` returns an error
    pub fn failing_on(mut self, identifier: &str) -> Self {
        self.failing_ids.insert(identifier.to_string());
        self
    }

    /// Listing `kind` returns an error
    pub fn failing_listing(mut self, kind: ResourceKind) -> Self {
        self.failing_listings.insert(kind);
        self
    }

    pub fn panicking_listing(mut self) -> Self {
        self.panic_on_listing = true;
        self
    }

    pub fn commands(&self) -> Vec<IssuedCommand> {
        self.commands.lock().unwrap().clone()
    }

    pub fn listing_calls(&self) -> usize {
        *self.listing_calls.lock().unwrap()
    }

    fn issue(&self, command: IssuedCommand, identifier: &str) -> Result<()> {
        self.commands.lock().unwrap().push(command);
        if self.failing_ids.contains(identifier) {
            return Err(anyhow!("InvalidDBInstanceState: {} cannot change state", identifier));
        }
        Ok(())
    }
}

#[async_trait]
impl DatabaseApi for FakeDatabase {
    async fn list_resources(&self, kind: ResourceKind) -> Result<Vec<ManagedResource>> {
        *self.listing_calls.lock().unwrap() += 1;
        if self.panic_on_listing {
            panic!("listing blew up");
        }
        if self.failing_listings.contains(&kind) {
            return Err(anyhow!("AccessDenied: not authorized to describe {}s", kind));
        }
        Ok(self
            .resources
            .iter()
            .filter(|r| r.kind == kind)
            .cloned()
            .collect())
    }

    async fn start_resource(&self, kind: ResourceKind, identifier: &str) -> Result<()> {
        self.issue(IssuedCommand::Start(kind, identifier.to_string()), identifier)
    }

    async fn stop_resource(&self, kind: ResourceKind, identifier: &str) -> Result<()> {
        self.issue(IssuedCommand::Stop(kind, identifier.to_string()), identifier)
    }

    async fn list_manual_snapshots(&self, kind: ResourceKind) -> Result<Vec<Snapshot>> {
        if self.failing_listings.contains(&kind) {
            return Err(anyhow!("AccessDenied: not authorized to describe {} snapshots", kind));
        }
        Ok(self
            .snapshots
            .iter()
            .filter(|s| s.kind == kind)
            .cloned()
            .collect())
    }
}
