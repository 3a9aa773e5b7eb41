//! Mock API HTTP server

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Json, Router, extract::State, http::StatusCode, middleware, routing::get};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use wafaux_auth::{BearerAuth, require_bearer};
use wafaux_common::{
    ApiError, Signal,
    access_log::log_requests,
    error::{method_not_allowed, not_found},
};

use crate::{ConfigStore, MockError, MockServerConfig};

/// Path of the authenticated configuration document
pub const CONFIG_PATH: &str = "/engine/v1/config";

/// Path of the unauthenticated health probe
pub const HEALTH_PATH: &str = "/health";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the mock API router
pub fn router(auth: BearerAuth, store: Arc<ConfigStore>) -> Router {
    let protected = Router::new()
        .route(CONFIG_PATH, get(config_handler))
        .route_layer(middleware::from_fn_with_state(auth, require_bearer))
        .with_state(store);

    Router::new()
        .route(HEALTH_PATH, get(health_handler))
        .merge(protected)
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(middleware::from_fn(log_requests))
}

/// Mock configuration-distribution server
pub struct MockServer {
    listener: TcpListener,
    router: Router,
}

impl MockServer {
    /// Seed the configuration file if needed and bind the server
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be created or
    /// binding to the configured address fails.
    pub async fn new(config: &MockServerConfig, auth: BearerAuth) -> Result<Self, MockError> {
        let store = ConfigStore::new(config.config_file.clone());
        store.ensure_exists().await?;

        let listener = TcpListener::bind(&config.listen_address)
            .await
            .map_err(|e| MockError::BindError {
                address: config.listen_address.clone(),
                source: e,
            })?;

        tracing::info!(
            address = %config.listen_address,
            config_file = %config.config_file.display(),
            "Mock API bound successfully"
        );

        Ok(Self {
            listener,
            router: router(auth, Arc::new(store)),
        })
    }

    /// Address actually bound, useful when binding to port 0
    ///
    /// # Errors
    ///
    /// Returns an error if the socket address cannot be queried.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the mock API until a shutdown signal is received
    ///
    /// # Errors
    ///
    /// Returns an error if the server encounters a runtime error.
    pub async fn serve(
        self,
        mut shutdown: tokio::sync::broadcast::Receiver<Signal>,
    ) -> Result<(), MockError> {
        tracing::info!("Mock API starting");
        tracing::info!("  GET {CONFIG_PATH} - configuration document (bearer token)");
        tracing::info!("  GET {HEALTH_PATH} - health check");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Mock API received shutdown signal");
            })
            .await
            .map_err(|e| MockError::ServerError(e.to_string()))?;

        tracing::info!("Mock API stopped");
        Ok(())
    }
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn config_handler(State(store): State<Arc<ConfigStore>>) -> Result<Json<Value>, ApiError> {
    store.load().await.map(Json).map_err(|err| {
        tracing::error!(error = %err, "Failed to load configuration document");
        ApiError::Internal
    })
}
