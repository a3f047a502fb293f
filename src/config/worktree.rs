//! Worktree configuration.

use serde::{Deserialize, Serialize};

/// Layout of per-bead git worktrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorktreeConfig {
    /// Directory holding worktrees, relative to the repo root.
    #[serde(default = "default_worktree_dir")]
    pub dir: String,

    /// Prefix joining a bead id into a worktree/branch name (`bd-` + id).
    #[serde(default = "default_branch_prefix")]
    pub branch_prefix: String,
}

fn default_worktree_dir() -> String {
    ".worktrees".to_string()
}

fn default_branch_prefix() -> String {
    "bd-".to_string()
}

impl WorktreeConfig {
    /// Branch (and worktree directory) name for a bead.
    #[must_use]
    pub fn branch_for(&self, bead_id: &str) -> String {
        format!("{}{bead_id}", self.branch_prefix)
    }
}

impl Default for WorktreeConfig {
    fn default() -> Self {
        Self {
            dir: default_worktree_dir(),
            branch_prefix: default_branch_prefix(),
        }
    }
}
