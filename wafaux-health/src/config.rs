//! Health relay configuration

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

/// Configuration for the health relay
#[derive(Debug, Clone, Deserialize)]
pub struct HealthConfig {
    /// Address to bind the relay to
    ///
    /// Common values:
    /// - `0.0.0.0:8888` (IPv4 any address, port 8888)
    /// - `[::]:8888` (IPv6 any address, port 8888)
    /// - `127.0.0.1:8888` (localhost only)
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Health-check executable
    ///
    /// It must print a JSON document on stdout and exit 0 when healthy,
    /// non-zero otherwise.
    #[serde(default = "default_script")]
    pub script: PathBuf,

    /// Arguments passed to the executable, requesting JSON output
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Seconds the executable may run before it is killed
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Working directory the executable runs in
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
}

impl HealthConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_listen_address() -> String {
    "0.0.0.0:8888".to_string()
}

fn default_script() -> PathBuf {
    PathBuf::from("/app/scripts/health-check.sh")
}

fn default_args() -> Vec<String> {
    vec!["--json".to_string()]
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_working_dir() -> PathBuf {
    PathBuf::from("/app/docker")
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            script: default_script(),
            args: default_args(),
            timeout_secs: default_timeout_secs(),
            working_dir: default_working_dir(),
        }
    }
}
