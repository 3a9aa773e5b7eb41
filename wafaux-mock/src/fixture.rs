//! Default configuration document handed out by the mock API
//!
//! Mirrors the shape the WAF config agent expects from the real
//! distribution endpoint: global defaults plus one routing rule per FQDN.

use serde::{Deserialize, Serialize};

/// Top-level configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockConfig {
    pub version: String,
    pub default_mode: String,
    pub default_custom_response: u16,
    pub fqdns: Vec<FqdnRule>,
}

/// Routing and protection settings for one FQDN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FqdnRule {
    pub fqdn: String,
    pub is_active: bool,
    pub waf_mode: String,
    pub custom_response: u16,
    pub backend_host: String,
    pub backend_port: u16,
    pub backend_path: String,
}

const DEFAULT_MODE: &str = "detect-learn";
const DEFAULT_CUSTOM_RESPONSE: u16 = 403;

impl FqdnRule {
    fn httpbin(fqdn: &str, backend_path: &str) -> Self {
        Self {
            fqdn: fqdn.to_string(),
            is_active: true,
            waf_mode: DEFAULT_MODE.to_string(),
            custom_response: DEFAULT_CUSTOM_RESPONSE,
            backend_host: "httpbin.org".to_string(),
            backend_port: 80,
            backend_path: backend_path.to_string(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            default_mode: DEFAULT_MODE.to_string(),
            default_custom_response: DEFAULT_CUSTOM_RESPONSE,
            fqdns: vec![
                FqdnRule::httpbin("test.example.com", "/get"),
                FqdnRule::httpbin("example1.com", "/json"),
                FqdnRule::httpbin("example2.com", "/xml"),
                FqdnRule::httpbin("example3.com", "/get"),
            ],
        }
    }
}
