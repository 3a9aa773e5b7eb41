//! Command-line and environment configuration

use std::path::PathBuf;

use clap::{Parser, builder::BoolishValueParser};
use wafaux_auth::AuthConfig;
use wafaux_health::HealthConfig;
use wafaux_mock::MockServerConfig;

/// Authenticated relay for the WAF engine health-check script
#[derive(Debug, Clone, Parser)]
#[command(name = "health-api", version)]
pub struct HealthApiArgs {
    /// Port to listen on, on all interfaces
    #[arg(long, env = "HEALTH_API_PORT", default_value_t = 8888)]
    pub port: u16,

    /// Full listen address, takes precedence over --port
    #[arg(long, env = "HEALTH_API_LISTEN")]
    pub listen: Option<String>,

    /// Bearer token clients must present
    #[arg(long, env = "HEALTH_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Start without a token and accept every request (development only)
    #[arg(long, env = "HEALTH_API_ALLOW_UNAUTHENTICATED", value_parser = BoolishValueParser::new())]
    pub allow_unauthenticated: bool,

    /// Seconds the health-check script may run
    #[arg(long = "timeout", env = "HEALTH_CHECK_TIMEOUT", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Working directory for the health-check script
    #[arg(long = "cwd", env = "HEALTH_CHECK_CWD", default_value = "/app/docker")]
    pub working_dir: PathBuf,

    /// Health-check executable, invoked with `--json`
    #[arg(
        long,
        env = "HEALTH_CHECK_SCRIPT",
        default_value = "/app/scripts/health-check.sh"
    )]
    pub script: PathBuf,
}

impl HealthApiArgs {
    #[must_use]
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            token: self.token.clone(),
            allow_unauthenticated: self.allow_unauthenticated,
        }
    }

    #[must_use]
    pub fn health_config(&self) -> HealthConfig {
        HealthConfig {
            listen_address: listen_address(self.listen.as_deref(), self.port),
            script: self.script.clone(),
            timeout_secs: self.timeout_secs,
            working_dir: self.working_dir.clone(),
            ..HealthConfig::default()
        }
    }
}

/// Mock configuration-distribution API for the WAF config agent
#[derive(Debug, Clone, Parser)]
#[command(name = "mock-api", version)]
pub struct MockApiArgs {
    /// Port to listen on, on all interfaces
    #[arg(long, env = "MOCK_API_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Full listen address, takes precedence over --port
    #[arg(long, env = "MOCK_API_LISTEN")]
    pub listen: Option<String>,

    /// JSON file holding the served configuration
    #[arg(
        long,
        env = "MOCK_API_CONFIG_FILE",
        default_value = "/tmp/mock-api-config.json"
    )]
    pub config_file: PathBuf,

    /// Bearer token clients must present
    #[arg(long, env = "MOCK_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Start without a token and accept every request (development only)
    #[arg(long, env = "MOCK_API_ALLOW_UNAUTHENTICATED", value_parser = BoolishValueParser::new())]
    pub allow_unauthenticated: bool,
}

impl MockApiArgs {
    #[must_use]
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            token: self.token.clone(),
            allow_unauthenticated: self.allow_unauthenticated,
        }
    }

    #[must_use]
    pub fn mock_config(&self) -> MockServerConfig {
        MockServerConfig {
            listen_address: listen_address(self.listen.as_deref(), self.port),
            config_file: self.config_file.clone(),
        }
    }
}

fn listen_address(listen: Option<&str>, port: u16) -> String {
    listen.map_or_else(|| format!("0.0.0.0:{port}"), str::to_string)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::time::Duration;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definitions_are_valid() {
        HealthApiArgs::command().debug_assert();
        MockApiArgs::command().debug_assert();
    }

    #[test]
    fn test_health_flags_map_onto_config() {
        let args = HealthApiArgs::try_parse_from([
            "health-api",
            "--port",
            "9000",
            "--timeout",
            "3",
            "--cwd",
            "/srv",
            "--script",
            "/usr/local/bin/check",
            "--token",
            "abc",
        ])
        .unwrap();

        let config = args.health_config();
        assert_eq!(config.listen_address, "0.0.0.0:9000");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.working_dir, PathBuf::from("/srv"));
        assert_eq!(config.script, PathBuf::from("/usr/local/bin/check"));
        assert_eq!(config.args, vec!["--json".to_string()]);
        assert_eq!(args.auth_config().token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_listen_overrides_port() {
        assert_eq!(listen_address(Some("127.0.0.1:1234"), 80), "127.0.0.1:1234");
        assert_eq!(listen_address(None, 80), "0.0.0.0:80");
    }

    #[test]
    fn test_allow_unauthenticated_flag() {
        let args =
            MockApiArgs::try_parse_from(["mock-api", "--allow-unauthenticated"]).unwrap();
        assert!(args.auth_config().allow_unauthenticated);
    }
}
