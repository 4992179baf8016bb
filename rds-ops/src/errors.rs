//! Custom error types for rds-ops
//!
//! Structured errors for the failures callers need to tell apart. Everything
//! else travels as `anyhow::Error` with context.

use std::fmt;

/// Main error type
#[derive(Debug)]
pub enum OpsError {
    /// Configuration-related errors
    Config(ConfigError),

    /// Holiday calendar errors
    Holiday(HolidayError),

    /// Database resource listing/action errors
    Resource(ResourceError),

    /// Snapshot report errors
    Report(ReportError),
}

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Missing required configuration
    MissingRequired { field: String },

    /// Configuration parsing error
    ParseError { reason: String },
}

/// Holiday calendar error variants
#[derive(Debug)]
pub enum HolidayError {
    /// Remote calendar could not be fetched
    FetchFailed { url: String, reason: String },

    /// Remote calendar is not valid Shift_JIS
    DecodeFailed { url: String },

    /// Calendar contents could not be parsed
    ParseFailed { reason: String },
}

/// Resource error variants
#[derive(Debug)]
pub enum ResourceError {
    /// Listing resources of a kind failed
    ListFailed { kind: String, reason: String },

    /// A start/stop command failed for one resource
    ActionFailed {
        identifier: String,
        action: String,
        reason: String,
    },
}

/// Snapshot report error variants
#[derive(Debug)]
pub enum ReportError {
    /// Secret not present in the store
    SecretNotFound { name: String },

    /// Secret present but without the expected key
    SecretKeyMissing { name: String, key: String },

    /// Account identity lookup returned nothing
    AccountUnknown,

    /// Task API answered with a non-success status
    Rejected { status: u16, body: String },
}

impl fmt::Display for OpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpsError::Config(e) => write!(f, "Configuration error: {}", e),
            OpsError::Holiday(e) => write!(f, "Holiday calendar error: {}", e),
            OpsError::Resource(e) => write!(f, "Resource error: {}", e),
            OpsError::Report(e) => write!(f, "Report error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required field: {}", field)
            }
            ConfigError::ParseError { reason } => {
                write!(f, "Failed to parse config: {}", reason)
            }
        }
    }
}

impl fmt::Display for HolidayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HolidayError::FetchFailed { url, reason } => {
                write!(f, "Failed to fetch holidays from {}: {}", url, reason)
            }
            HolidayError::DecodeFailed { url } => {
                write!(f, "Holiday calendar from {} is not valid Shift_JIS", url)
            }
            HolidayError::ParseFailed { reason } => {
                write!(f, "Failed to parse holiday calendar: {}", reason)
            }
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::ListFailed { kind, reason } => {
                write!(f, "Failed to list {}s: {}", kind, reason)
            }
            ResourceError::ActionFailed {
                identifier,
                action,
                reason,
            } => {
                write!(f, "Failed to {} '{}': {}", action, identifier, reason)
            }
        }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::SecretNotFound { name } => {
                write!(f, "Secret '{}' not found", name)
            }
            ReportError::SecretKeyMissing { name, key } => {
                write!(f, "Secret '{}' has no string value for key '{}'", name, key)
            }
            ReportError::AccountUnknown => {
                write!(f, "Caller identity did not include an account id")
            }
            ReportError::Rejected { status, body } => {
                write!(f, "Task API returned status {}: {}", status, body)
            }
        }
    }
}

impl std::error::Error for OpsError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for HolidayError {}
impl std::error::Error for ResourceError {}
impl std::error::Error for ReportError {}

impl From<ConfigError> for OpsError {
    fn from(err: ConfigError) -> Self {
        OpsError::Config(err)
    }
}

impl From<HolidayError> for OpsError {
    fn from(err: HolidayError) -> Self {
        OpsError::Holiday(err)
    }
}

impl From<ResourceError> for OpsError {
    fn from(err: ResourceError) -> Self {
        OpsError::Resource(err)
    }
}

impl From<ReportError> for OpsError {
    fn from(err: ReportError) -> Self {
        OpsError::Report(err)
    }
}
