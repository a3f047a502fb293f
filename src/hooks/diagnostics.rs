//! Append-only diagnostic log for swallowed hook failures.

use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};

/// File name of the diagnostic log at the project root.
pub const ERROR_LOG_FILE: &str = "beads_orchestrator_errors.log";

/// Records hook failures as `[<RFC3339>] [<hook>] <message>` lines.
///
/// Writing is best effort: a failure to record is itself only traced.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    #[must_use]
    pub fn for_project(project_dir: &Path) -> Self {
        Self {
            path: project_dir.join(ERROR_LOG_FILE),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, hook: &str, message: impl Display) {
        tracing::warn!(hook, error = %message, "Hook failure (fail-open)");

        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let line = format!("[{ts}] [{hook}] {message}\n");
        let written = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(line.as_bytes()));

        if let Err(e) = written {
            tracing::debug!(path = %self.path.display(), error = %e, "Could not write diagnostic log");
        }
    }
}

/// Convert a failure into `None`, recording it under `hook`.
pub fn fail_open<T, E: Display>(log: &ErrorLog, hook: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log.record(hook, e);
            None
        }
    }
}
