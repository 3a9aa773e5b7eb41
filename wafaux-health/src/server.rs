//! Health relay HTTP server

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use wafaux_auth::{BearerAuth, require_bearer};
use wafaux_common::{
    Signal,
    access_log::log_requests,
    error::{method_not_allowed, not_found},
};

use crate::{
    HealthConfig, HealthError,
    probe::{HealthProbe, ProbeOutcome, UnhealthyReport},
};

/// Path of the authenticated health report
pub const HEALTH_REPORT_PATH: &str = "/engine/v1/health";

/// Path of the unauthenticated liveness probe
pub const LIVENESS_PATH: &str = "/health";

/// Slack on top of the probe deadline before the whole request is abandoned
const REQUEST_GRACE: Duration = Duration::from_secs(5);

#[derive(Clone)]
struct RelayState {
    probe: Arc<dyn HealthProbe>,
}

/// Build the relay router
///
/// `request_timeout` bounds every request end to end. It should be longer
/// than the probe's own deadline so that a timed-out probe still gets its
/// 503 answer.
pub fn router(auth: BearerAuth, probe: Arc<dyn HealthProbe>, request_timeout: Duration) -> Router {
    let protected = Router::new()
        .route(HEALTH_REPORT_PATH, get(health_report_handler))
        .route_layer(middleware::from_fn_with_state(auth, require_bearer))
        .with_state(RelayState { probe });

    Router::new()
        .route(LIVENESS_PATH, get(liveness_handler))
        .merge(protected)
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::from_fn(log_requests))
}

/// Health relay HTTP server
///
/// Every connection is served on its own task, so a slow health check only
/// holds up the request waiting on it.
pub struct HealthServer {
    listener: TcpListener,
    router: Router,
}

impl HealthServer {
    /// Bind the relay
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the configured address fails.
    pub async fn new(
        config: &HealthConfig,
        auth: BearerAuth,
        probe: Arc<dyn HealthProbe>,
    ) -> Result<Self, HealthError> {
        let listener = TcpListener::bind(&config.listen_address)
            .await
            .map_err(|e| HealthError::BindError {
                address: config.listen_address.clone(),
                source: e,
            })?;

        tracing::info!(
            address = %config.listen_address,
            script = %config.script.display(),
            working_dir = %config.working_dir.display(),
            timeout_secs = config.timeout_secs,
            "Health relay bound successfully"
        );

        let router = router(auth, probe, config.timeout() + REQUEST_GRACE);

        Ok(Self { listener, router })
    }

    /// Address actually bound, useful when binding to port 0
    ///
    /// # Errors
    ///
    /// Returns an error if the socket address cannot be queried.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the relay until a shutdown signal is received
    ///
    /// # Errors
    ///
    /// Returns an error if the server encounters a runtime error.
    pub async fn serve(
        self,
        mut shutdown: tokio::sync::broadcast::Receiver<Signal>,
    ) -> Result<(), HealthError> {
        tracing::info!("Health relay starting");
        tracing::info!("  GET {HEALTH_REPORT_PATH} - detailed health report (bearer token)");
        tracing::info!("  GET {LIVENESS_PATH} - liveness probe");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Health relay received shutdown signal");
            })
            .await
            .map_err(|e| HealthError::ServerError(e.to_string()))?;

        tracing::info!("Health relay stopped");
        Ok(())
    }
}

/// Liveness probe handler
///
/// Never authenticates and never runs the health check, so orchestration
/// probes keep working while the check itself is slow or broken.
async fn liveness_handler() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

/// Detailed health report handler
///
/// Runs the probe once and relays its verdict. Anything that must not reach
/// the client is logged here.
async fn health_report_handler(State(state): State<RelayState>) -> Response {
    let outcome = state.probe.probe().await;

    match &outcome {
        ProbeOutcome::Healthy(_) => tracing::debug!("Health check passed"),
        ProbeOutcome::Unhealthy(UnhealthyReport::Json(_)) => {
            tracing::warn!("Health check reported unhealthy");
        }
        ProbeOutcome::Unhealthy(UnhealthyReport::Raw {
            exit_code,
            stdout,
            stderr,
        }) => tracing::error!(
            ?exit_code,
            stdout = stdout.as_str(),
            stderr = stderr.as_str(),
            "Health check script failed without a JSON report"
        ),
        ProbeOutcome::TimedOut(after) => tracing::error!(
            timeout_secs = after.as_secs_f64(),
            "Health check timeout"
        ),
        ProbeOutcome::Failed(err) => {
            tracing::error!(error = %err, "Unexpected error during health check");
        }
    }

    outcome.into_response()
}
