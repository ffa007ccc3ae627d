//! Error types for the telemetry pipeline.
//!
//! Failures here are deliberately invisible to the session model: a missing
//! setting means the sink is simply not installed, and transport or publisher
//! failures are logged and swallowed inside the pipeline.

use thiserror::Error;

/// The configuration refused construction of a telemetry service.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required property had no value.
    #[error("required property not set: {0}")]
    MissingProperty(&'static str),
    /// The sink is switched off; the host installs nothing.
    #[error("time-series logging is disabled")]
    Disabled,
}

/// A payload could not be delivered to the time-series backend.
///
/// Only ever logged; the dispatcher never surfaces this to callers.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The backend answered with a non-200 status.
    #[error("unexpected HTTP response code: {0}")]
    Status(u16),
    /// The HTTP request itself failed.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// A metric publisher failed to accept a metric write.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct PublishError {
    reason: String,
}

impl PublishError {
    /// Creates a publisher error with a human-readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl From<std::io::Error> for PublishError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}
