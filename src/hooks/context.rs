//! Ambient state threaded into every rule.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::beads::BeadsClient;
use crate::config::GuardConfig;
use crate::knowledge::KnowledgeStore;
use crate::probe::CommandRunner;
use crate::vcs::{Git, GitHub};

use super::diagnostics::ErrorLog;

/// Environment variable Claude Code sets to the project root.
pub const PROJECT_DIR_ENV: &str = "CLAUDE_PROJECT_DIR";

/// `$CLAUDE_PROJECT_DIR` if set and non-empty, else the process cwd.
#[must_use]
pub fn resolve_project_dir() -> PathBuf {
    std::env::var_os(PROJECT_DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Everything a rule may consult besides its input envelope.
#[derive(Clone)]
pub struct HookContext {
    project_dir: PathBuf,
    cwd: PathBuf,
    config: GuardConfig,
    runner: Arc<dyn CommandRunner>,
    errors: ErrorLog,
}

impl std::fmt::Debug for HookContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookContext")
            .field("project_dir", &self.project_dir)
            .field("cwd", &self.cwd)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HookContext {
    #[must_use]
    pub fn new(
        project_dir: impl Into<PathBuf>,
        cwd: impl Into<PathBuf>,
        config: GuardConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        let project_dir = project_dir.into();
        Self {
            errors: ErrorLog::for_project(&project_dir),
            project_dir,
            cwd: cwd.into(),
            config,
            runner,
        }
    }

    /// Context for the running process: project dir from the environment,
    /// cwd from the OS.
    #[must_use]
    pub fn from_env(config: GuardConfig, runner: Arc<dyn CommandRunner>) -> Self {
        let project_dir = resolve_project_dir();
        let cwd = std::env::current_dir().unwrap_or_else(|_| project_dir.clone());
        Self::new(project_dir, cwd, config, runner)
    }

    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    #[must_use]
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    #[must_use]
    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner.as_ref()
    }

    #[must_use]
    pub fn errors(&self) -> &ErrorLog {
        &self.errors
    }

    /// `git` in the hook's working directory.
    #[must_use]
    pub fn git(&self) -> Git<'_> {
        Git::new(self.runner(), Some(&self.cwd))
    }

    #[must_use]
    pub fn beads(&self) -> BeadsClient<'_> {
        BeadsClient::new(self.runner(), Some(&self.cwd))
    }

    #[must_use]
    pub fn github(&self) -> GitHub<'_> {
        GitHub::new(self.runner(), Some(&self.cwd))
    }

    #[must_use]
    pub fn knowledge_store(&self) -> KnowledgeStore {
        KnowledgeStore::for_project(&self.project_dir, &self.config.knowledge)
    }

    /// Current Unix time in seconds.
    #[must_use]
    pub fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}
