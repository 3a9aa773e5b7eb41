//! Mock API configuration

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct MockServerConfig {
    /// Address to bind the mock API to
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// JSON document served by `/engine/v1/config`
    ///
    /// Created from the default fixture when it does not exist.
    #[serde(default = "default_config_file")]
    pub config_file: PathBuf,
}

fn default_listen_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_config_file() -> PathBuf {
    PathBuf::from("/tmp/mock-api-config.json")
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            config_file: default_config_file(),
        }
    }
}
