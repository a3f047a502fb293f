//! In-memory [`CommandRunner`] with canned responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use super::runner::{CommandRunner, ProbeError};

/// Canned outcome for one command line.
#[derive(Debug, Clone)]
enum Response {
    Output(String),
    Fail,
}

/// Answers commands from a table keyed by `"program arg1 arg2 ..."`.
///
/// Commands without a scripted response fail, which rules observe as
/// `Probe::Unknown`. Every call is recorded for later assertions.
#[derive(Debug, Default)]
pub struct FakeRunner {
    responses: HashMap<String, Response>,
    calls: Mutex<Vec<String>>,
}

impl FakeRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script stdout for a command line.
    #[must_use]
    pub fn respond(mut self, command: &str, stdout: impl Into<String>) -> Self {
        self.responses
            .insert(command.to_string(), Response::Output(stdout.into()));
        self
    }

    /// Script a nonzero exit for a command line.
    #[must_use]
    pub fn fail(mut self, command: &str) -> Self {
        self.responses.insert(command.to_string(), Response::Fail);
        self
    }

    /// Command lines run so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Whether any recorded call starts with `prefix`.
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.calls().iter().any(|c| c.starts_with(prefix))
    }

    fn key(program: &str, args: &[&str]) -> String {
        std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(
        &self,
        program: &str,
        args: &[&str],
        _cwd: Option<&Path>,
    ) -> Result<String, ProbeError> {
        let key = Self::key(program, args);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(key.clone());
        }

        match self.responses.get(&key) {
            Some(Response::Output(out)) => Ok(out.trim().to_string()),
            Some(Response::Fail) | None => Err(ProbeError::Failed {
                program: program.to_string(),
                code: Some(1),
                stderr: format!("no scripted response for `{key}`"),
            }),
        }
    }
}
