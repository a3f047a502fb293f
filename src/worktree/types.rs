//! Worktree types.

use std::path::{Path, PathBuf};

use crate::config::WorktreeConfig;

/// A git worktree as reported by `git worktree list --porcelain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worktree {
    /// Directory name, e.g. `bd-12`.
    pub name: String,

    /// Absolute path to the worktree directory.
    pub path: PathBuf,

    /// Checked-out branch; `None` for a detached HEAD.
    pub branch: Option<String>,
}

impl Worktree {
    #[must_use]
    pub fn new(path: PathBuf, branch: Option<String>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path, branch }
    }

    /// Bead id encoded in a `<prefix><id>` directory name.
    #[must_use]
    pub fn bead_id(&self, config: &WorktreeConfig) -> Option<&str> {
        self.name
            .strip_prefix(config.branch_prefix.as_str())
            .filter(|id| !id.is_empty())
    }

    /// Whether this worktree lives in the bead worktree directory.
    #[must_use]
    pub fn is_bead_worktree(&self, config: &WorktreeConfig) -> bool {
        let marker = format!("{}/{}", config.dir, config.branch_prefix);
        self.path.to_string_lossy().replace('\\', "/").contains(&marker)
    }

    /// Command that removes this worktree and closes its bead.
    #[must_use]
    pub fn cleanup_command(&self, bead_id: &str) -> String {
        format!(
            "git worktree remove \"{}\" && bd close \"{}\"",
            self.path.display(),
            bead_id
        )
    }
}

/// Where the worktree for `bead_id` lives under `repo_root`.
#[must_use]
pub fn worktree_path(repo_root: &Path, config: &WorktreeConfig, bead_id: &str) -> PathBuf {
    repo_root.join(&config.dir).join(config.branch_for(bead_id))
}
