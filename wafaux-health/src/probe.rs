//! Health-check invocation
//!
//! A [`HealthProbe`] performs one health check and reports a tagged
//! [`ProbeOutcome`]. Turning that outcome into HTTP lives in
//! [`crate::response`], so either half can be tested alone.

use std::{
    path::PathBuf,
    process::{ExitStatus, Stdio},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;

use crate::{HealthConfig, ProbeError};

/// Result of a single health-check invocation
#[derive(Debug)]
pub enum ProbeOutcome {
    /// Exit status 0 with a JSON report
    Healthy(Value),

    /// Non-zero exit status
    Unhealthy(UnhealthyReport),

    /// The check did not finish within the deadline and was killed
    TimedOut(Duration),

    /// The check could not be run or its output could not be read
    Failed(ProbeError),
}

/// What an unhealthy check printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnhealthyReport {
    /// Stdout parsed as JSON
    Json(Value),

    /// Stdout was not JSON. Kept for the server log only.
    Raw {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl ProbeOutcome {
    /// Classify a finished process from its exit status and captured output
    #[must_use]
    pub fn from_output(status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> Self {
        let report = serde_json::from_slice::<Value>(stdout);

        match (status.success(), report) {
            (true, Ok(report)) => Self::Healthy(report),
            (true, Err(err)) => Self::Failed(ProbeError::MalformedReport(err)),
            (false, Ok(report)) => Self::Unhealthy(UnhealthyReport::Json(report)),
            (false, Err(_)) => Self::Unhealthy(UnhealthyReport::Raw {
                exit_code: status.code(),
                stdout: String::from_utf8_lossy(stdout).into_owned(),
                stderr: String::from_utf8_lossy(stderr).into_owned(),
            }),
        }
    }
}

/// Something that can answer "is the engine healthy?"
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Run one health check
    ///
    /// Must return within a bounded time; implementations enforce their own
    /// deadline.
    async fn probe(&self) -> ProbeOutcome;
}

/// Runs an external executable as the health check
#[derive(Debug, Clone)]
pub struct ScriptProbe {
    script: PathBuf,
    args: Vec<String>,
    working_dir: PathBuf,
    timeout: Duration,
}

impl ScriptProbe {
    #[must_use]
    pub fn new(
        script: impl Into<PathBuf>,
        args: Vec<String>,
        working_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            script: script.into(),
            args,
            working_dir: working_dir.into(),
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &HealthConfig) -> Self {
        Self::new(
            config.script.clone(),
            config.args.clone(),
            config.working_dir.clone(),
            config.timeout(),
        )
    }
}

#[async_trait]
impl HealthProbe for ScriptProbe {
    async fn probe(&self) -> ProbeOutcome {
        let started = Instant::now();

        let mut command = Command::new(&self.script);
        command
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so a timeout can take down everything the
        // check started and not just the check itself
        #[cfg(unix)]
        command.process_group(0);

        let child = command.spawn();

        let child = match child {
            Ok(child) => child,
            Err(source) => {
                return ProbeOutcome::Failed(ProbeError::Spawn {
                    script: self.script.clone(),
                    source,
                });
            }
        };

        let pid = child.id();
        tracing::debug!(
            script = %self.script.display(),
            pid,
            "Health check started"
        );

        // The child itself is killed when `wait` is dropped
        let wait = child.wait_with_output();
        tokio::pin!(wait);

        let outcome = match tokio::time::timeout(self.timeout, &mut wait).await {
            Ok(Ok(output)) => ProbeOutcome::from_output(output.status, &output.stdout, &output.stderr),
            Ok(Err(err)) => ProbeOutcome::Failed(ProbeError::Io(err)),
            Err(_) => {
                // Leader not yet reaped, so the group id cannot have been reused
                if let Some(pid) = pid {
                    kill_process_group(pid);
                }
                ProbeOutcome::TimedOut(self.timeout)
            }
        };

        tracing::debug!(
            script = %self.script.display(),
            elapsed_ms = started.elapsed().as_millis(),
            "Health check finished"
        );

        outcome
    }
}

/// Send `SIGKILL` to every process in the group led by `pgid`
#[cfg(unix)]
fn kill_process_group(pgid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pgid) else {
        return;
    };

    // SAFETY: killpg takes plain integers and touches no memory of ours
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
        let err = std::io::Error::last_os_error();
        // ESRCH: the whole group already exited
        if err.raw_os_error() != Some(libc::ESRCH) {
            tracing::warn!(error = %err, pgid, "Failed to kill health check process group");
        }
    }
}

#[cfg(not(unix))]
const fn kill_process_group(_pgid: u32) {}
