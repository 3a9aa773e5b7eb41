//! Shared helpers for the relay integration tests
#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::{Value, json};
use tempfile::TempDir;
use wafaux_auth::{AuthConfig, BearerAuth};
use wafaux_health::{HealthProbe, ProbeOutcome, ScriptProbe};

pub const TOKEN: &str = "relay-test-token";

pub fn token_auth() -> BearerAuth {
    BearerAuth::from_config(&AuthConfig {
        token: Some(TOKEN.to_string()),
        allow_unauthenticated: false,
    })
    .unwrap()
}

/// Probe that records how often it ran and always reports healthy
#[derive(Default)]
pub struct SpyProbe {
    calls: AtomicUsize,
}

impl SpyProbe {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthProbe for SpyProbe {
    async fn probe(&self) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ProbeOutcome::Healthy(json!({ "status": "healthy" }))
    }
}

/// Probe that takes `delay` before reporting healthy
pub struct SlowProbe {
    pub delay: Duration,
}

#[async_trait]
impl HealthProbe for SlowProbe {
    async fn probe(&self) -> ProbeOutcome {
        tokio::time::sleep(self.delay).await;
        ProbeOutcome::Healthy(json!({ "status": "healthy", "slow": true }))
    }
}

/// A stub health-check script in its own temporary directory
///
/// The script is run through `/bin/sh` rather than executed directly, which
/// sidesteps `ETXTBSY` when tests write and spawn scripts concurrently. It
/// refuses to run unless it was asked for JSON output.
pub struct StubScript {
    dir: TempDir,
    path: PathBuf,
}

impl StubScript {
    pub fn new(body: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("health-check.sh");
        let script = format!(
            "#!/bin/sh\n[ \"$1\" = \"--json\" ] || {{ echo 'expected --json' >&2; exit 64; }}\n{body}\n"
        );
        std::fs::write(&path, script).unwrap();
        Self { dir, path }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn probe(&self, timeout: Duration) -> Arc<ScriptProbe> {
        Arc::new(ScriptProbe::new(
            "/bin/sh",
            vec![self.path.display().to_string(), "--json".to_string()],
            self.dir.path(),
            timeout,
        ))
    }
}

pub fn body_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}
