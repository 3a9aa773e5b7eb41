//! Authenticated health-check relay for the WAF engine
//!
//! Runs an external health-check executable on demand and relays its
//! verdict over HTTP.
//!
//! # Endpoints
//!
//! - **`/health`** - Liveness probe: always `200 {"status":"ok"}`, no auth
//! - **`/engine/v1/health`** - Bearer-authenticated; runs the check and
//!   answers 200 (healthy), 503 (unhealthy or timed out) or 500
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wafaux_auth::{AuthConfig, BearerAuth};
//! use wafaux_health::{HealthConfig, HealthServer, ScriptProbe};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HealthConfig::default();
//! let auth = BearerAuth::from_config(&AuthConfig {
//!     token: Some("secret".to_string()),
//!     allow_unauthenticated: false,
//! })?;
//! let probe = Arc::new(ScriptProbe::from_config(&config));
//! let server = HealthServer::new(&config, auth, probe).await?;
//!
//! // server.serve(shutdown_receiver).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod probe;
mod response;
mod server;

pub use config::HealthConfig;
pub use error::{HealthError, ProbeError};
pub use probe::{HealthProbe, ProbeOutcome, ScriptProbe, UnhealthyReport};
pub use server::{HEALTH_REPORT_PATH, HealthServer, LIVENESS_PATH, router};
