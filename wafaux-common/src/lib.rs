//! Plumbing shared by the wafaux auxiliary servers.
//!
//! - [`logging`] sets up the `tracing` subscriber used by every binary.
//! - [`error::ApiError`] renders the generic JSON error bodies.
//! - [`access_log`] is the per-request access log middleware.
//! - [`Signal`] and [`shutdown_signal`] drive graceful shutdown.

pub mod access_log;
pub mod error;
pub mod logging;

pub use error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Shutdown,
}

/// Resolve once the process receives `SIGINT` or `SIGTERM`.
///
/// If a handler cannot be installed the failure is logged and that signal is
/// ignored, the other one still triggers shutdown.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Unable to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

/// Forward the first termination signal to every subscriber of `sender`.
pub async fn broadcast_shutdown(sender: tokio::sync::broadcast::Sender<Signal>) {
    shutdown_signal().await;
    tracing::info!("Shutdown signal received");
    let _ = sender.send(Signal::Shutdown);
}
