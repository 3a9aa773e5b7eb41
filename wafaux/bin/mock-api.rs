#![deny(clippy::pedantic, clippy::all, clippy::nursery)]

use clap::Parser;
use tokio::sync::broadcast;
use wafaux::cli::MockApiArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wafaux_common::logging::init();

    let args = MockApiArgs::parse();
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(wafaux_common::broadcast_shutdown(shutdown_tx));

    wafaux::run_mock_api(&args, shutdown_rx)
        .await
        .inspect_err(|err| tracing::error!(target: "wafaux", error = %format!("{err:#}"), "Mock API exited"))
}
