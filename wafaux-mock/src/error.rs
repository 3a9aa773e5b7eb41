//! Mock API error types

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors starting or running the mock API server
#[derive(Debug, Error)]
pub enum MockError {
    /// Failed to bind to the specified address
    #[error("Failed to bind mock API to {address}: {source}")]
    BindError { address: String, source: io::Error },

    /// The configuration file could not be prepared at startup
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Mock API server encountered a runtime error
    #[error("Mock API error: {0}")]
    ServerError(String),
}

/// Errors reading or initialising the configuration file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("{} does not contain valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialise default configuration: {0}")]
    Serialise(#[source] serde_json::Error),
}
