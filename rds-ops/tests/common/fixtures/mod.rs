//! This module provides reusable test utilities:
//! - In-memory database API fake that records commands
//! - Mock HTTP servers (holiday calendar, task API)
//! - Fixed clock, static secrets and account identity
//! - Common test data builders

// Each test binary uses a different subset of the fixtures
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fake_rds;
pub mod mock_calendar;
pub mod mock_tasks;
pub mod test_data;

// Re-export commonly used items
pub use fake_rds::{FakeDatabase, IssuedCommand};
pub use mock_calendar::{MockCalendarServer, SAMPLE_CALENDAR};
pub use mock_tasks::{MockTaskServer, TASK_GID};
pub use test_data::*;
