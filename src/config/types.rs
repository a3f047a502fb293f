//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::WorktreeConfig;

/// Knowledge log location and rotation thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Directory holding the logs, relative to the project root.
    pub memory_dir: PathBuf,
    /// Active log line count above which rotation runs.
    pub max_active_lines: usize,
    /// Number of oldest lines moved to the archive per rotation.
    pub rotate_batch: usize,
    /// Maximum characters of captured content.
    pub max_content_chars: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            memory_dir: PathBuf::from(".beads").join("memory"),
            max_active_lines: 1000,
            rotate_batch: 500,
            max_content_chars: 2048,
        }
    }
}

/// External command settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Upper bound on any single `git`/`bd`/`gh` invocation.
    pub timeout_secs: u64,
}

impl CommandsConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Branches on which direct edits are refused.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchConfig {
    pub protected: Vec<String>,
}

impl BranchConfig {
    #[must_use]
    pub fn is_protected(&self, branch: &str) -> bool {
        self.protected.iter().any(|b| b == branch)
    }
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            protected: vec!["main".to_string(), "master".to_string()],
        }
    }
}

/// Size limits applied to prompts and agent responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max lines of a Task result before a conciseness warning.
    pub subagent_response_lines: usize,
    /// Max chars of a Task result before a conciseness warning.
    pub subagent_response_chars: usize,
    /// Max lines of a supervisor's completion report.
    pub completion_lines: usize,
    /// Max chars of a supervisor's completion report.
    pub completion_chars: usize,
    /// Prompts shorter than this must be clarified before work starts.
    pub short_prompt_chars: usize,
    /// Prompts shorter than this get a softer ambiguity reminder.
    pub ambiguous_prompt_chars: usize,
    /// Dispatch prompts are truncated to this many chars when logged.
    pub dispatch_prompt_chars: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            subagent_response_lines: 10,
            subagent_response_chars: 500,
            completion_lines: 15,
            completion_chars: 800,
            short_prompt_chars: 50,
            ambiguous_prompt_chars: 200,
            dispatch_prompt_chars: 2048,
        }
    }
}

/// Agents the orchestrator may invoke through the provider delegator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegationConfig {
    pub codex_agents: Vec<String>,
}

impl Default for DelegationConfig {
    fn default() -> Self {
        Self {
            codex_agents: ["scout", "detective", "architect", "scribe", "code-reviewer"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Top-level configuration for all hooks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub knowledge: KnowledgeConfig,
    pub commands: CommandsConfig,
    pub branches: BranchConfig,
    pub worktree: WorktreeConfig,
    pub limits: LimitsConfig,
    pub delegation: DelegationConfig,
}
