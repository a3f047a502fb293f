//! Bounded subprocess execution.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::Probe;

/// Errors from running an external command.
#[derive(thiserror::Error, Debug)]
pub enum ProbeError {
    /// The program could not be started.
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program did not finish in time and was killed.
    #[error("{program} timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    /// The program exited unsuccessfully.
    #[error("{program} exited with {code:?}: {stderr}")]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Runs external programs on behalf of hook rules.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, returning trimmed stdout on success.
    async fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>)
        -> Result<String, ProbeError>;

    /// Like [`CommandRunner::run`], folding every failure into `Unknown`.
    async fn probe(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Probe<String> {
        match self.run(program, args, cwd).await {
            Ok(out) => Probe::Known(out),
            Err(e) => {
                tracing::debug!(error = %e, "External command unavailable");
                Probe::Unknown
            }
        }
    }
}

/// Runs real processes with a per-call timeout.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
    cwd: Option<PathBuf>,
}

impl SystemRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout, cwd: None }
    }

    /// Default directory for calls that do not pass one.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<String, ProbeError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = cwd.or(self.cwd.as_deref()) {
            cmd.current_dir(dir);
        }

        tracing::trace!(program, ?args, "Running external command");
        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ProbeError::Timeout {
                program: program.to_string(),
                secs: self.timeout.as_secs(),
            })?
            .map_err(|source| ProbeError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                program: program.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
