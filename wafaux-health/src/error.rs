//! Health relay error types

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors starting or running the relay server
#[derive(Debug, Error)]
pub enum HealthError {
    /// Failed to bind to the specified address
    #[error("Failed to bind health relay to {address}: {source}")]
    BindError { address: String, source: io::Error },

    /// Relay server encountered a runtime error
    #[error("Health relay error: {0}")]
    ServerError(String),
}

/// Ways a single health-check invocation can fail outright
///
/// These never reach the client; they are logged and answered with a
/// generic 500.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The executable could not be started
    #[error("Failed to launch {script}: {source}")]
    Spawn { script: PathBuf, source: io::Error },

    /// Waiting on the child or reading its output failed
    #[error("Failed to collect health check output: {0}")]
    Io(#[source] io::Error),

    /// Exit status 0 but stdout was not JSON
    #[error("Health check reported success with a malformed report: {0}")]
    MalformedReport(#[source] serde_json::Error),
}
