//! Mock configuration-distribution API
//!
//! Stands in for the real distribution endpoint while developing the WAF
//! config agent. The served document lives in a JSON file that is created
//! from [`MockConfig::default`] on first use and can be edited by hand.
//!
//! # Endpoints
//!
//! - **`/engine/v1/config`** - Bearer-authenticated; returns the document
//! - **`/health`** - Unauthenticated; always `{"status":"healthy"}`

mod config;
mod error;
mod fixture;
mod server;
mod store;

pub use config::MockServerConfig;
pub use error::{MockError, StoreError};
pub use fixture::{FqdnRule, MockConfig};
pub use server::{CONFIG_PATH, HEALTH_PATH, MockServer, router};
pub use store::ConfigStore;
