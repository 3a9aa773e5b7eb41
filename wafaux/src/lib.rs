//! Startup for the `health-api` and `mock-api` binaries
//!
//! Configuration comes from command-line flags, each of which can also be
//! given through an environment variable. It is read exactly once, turned
//! into immutable config structs and handed to the servers.

pub mod cli;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::broadcast;
use wafaux_auth::BearerAuth;
use wafaux_common::Signal;
use wafaux_health::{HealthServer, ScriptProbe};
use wafaux_mock::MockServer;

use crate::cli::{HealthApiArgs, MockApiArgs};

/// Run the health relay until `shutdown` fires
///
/// Authentication is resolved before anything is bound, so a missing token
/// stops the process without ever opening a port.
///
/// # Errors
///
/// Returns an error if no token is configured without the explicit opt-in,
/// if binding fails, or if the server fails while running.
pub async fn run_health_api(
    args: &HealthApiArgs,
    shutdown: broadcast::Receiver<Signal>,
) -> anyhow::Result<()> {
    let auth = BearerAuth::from_config(&args.auth_config())
        .context("Refusing to start the health relay")?;

    let config = args.health_config();
    let probe = Arc::new(ScriptProbe::from_config(&config));
    let server = HealthServer::new(&config, auth, probe).await?;

    server.serve(shutdown).await?;
    Ok(())
}

/// Run the mock configuration API until `shutdown` fires
///
/// # Errors
///
/// Returns an error if no token is configured without the explicit opt-in,
/// if the configuration file cannot be seeded, if binding fails, or if the
/// server fails while running.
pub async fn run_mock_api(
    args: &MockApiArgs,
    shutdown: broadcast::Receiver<Signal>,
) -> anyhow::Result<()> {
    let auth =
        BearerAuth::from_config(&args.auth_config()).context("Refusing to start the mock API")?;

    let server = MockServer::new(&args.mock_config(), auth).await?;

    server.serve(shutdown).await?;
    Ok(())
}
