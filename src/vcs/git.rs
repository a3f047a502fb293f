//! Read-only git queries.

use std::path::Path;

use crate::probe::{CommandRunner, Probe};

const GIT: &str = "git";

/// Remote checked for pushed branches.
pub const ORIGIN: &str = "origin";

/// `git` run in a fixed directory (or the process cwd when `None`).
#[derive(Clone, Copy)]
pub struct Git<'a> {
    runner: &'a dyn CommandRunner,
    dir: Option<&'a Path>,
}

impl std::fmt::Debug for Git<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git").field("dir", &self.dir).finish()
    }
}

impl<'a> Git<'a> {
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner, dir: Option<&'a Path>) -> Self {
        Self { runner, dir }
    }

    /// Same runner, different working directory.
    #[must_use]
    pub fn at<'b>(&self, dir: &'b Path) -> Git<'b>
    where
        'a: 'b,
    {
        Git {
            runner: self.runner,
            dir: Some(dir),
        }
    }

    async fn run(&self, args: &[&str]) -> Probe<String> {
        self.runner.probe(GIT, args, self.dir).await
    }

    /// Checked-out branch. A detached HEAD prints nothing and is `Unknown`.
    pub async fn current_branch(&self) -> Probe<String> {
        self.run(&["branch", "--show-current"])
            .await
            .and_then(|b| if b.is_empty() { Probe::Unknown } else { Probe::Known(b) })
    }

    pub async fn repo_root(&self) -> Probe<String> {
        self.run(&["rev-parse", "--show-toplevel"])
            .await
            .and_then(|r| if r.is_empty() { Probe::Unknown } else { Probe::Known(r) })
    }

    /// `true` when `git status --porcelain` lists anything.
    pub async fn is_dirty(&self) -> Probe<bool> {
        self.run(&["status", "--porcelain"]).await.non_empty()
    }

    /// URL of `origin`. A repository without that remote is `Unknown` too,
    /// since git reports both cases with a nonzero exit.
    pub async fn origin_url(&self) -> Probe<String> {
        self.run(&["remote", "get-url", ORIGIN]).await
    }

    /// Whether `branch` exists on `origin`.
    pub async fn remote_branch_exists(&self, branch: &str) -> Probe<bool> {
        self.run(&["ls-remote", "--heads", ORIGIN, branch])
            .await
            .non_empty()
    }

    /// Raw `git worktree list --porcelain`.
    pub async fn worktree_list(&self) -> Probe<String> {
        self.run(&["worktree", "list", "--porcelain"]).await
    }

    /// Local branches merged into `base`, with the `*` marker stripped.
    pub async fn merged_branches(&self, base: &str) -> Probe<Vec<String>> {
        self.run(&["branch", "--merged", base])
            .await
            .map(|out| parse_branch_list(&out))
    }
}

/// Parse `git branch` output into bare names.
#[must_use]
pub fn parse_branch_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').map_or(line, str::trim_start).to_string()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::FakeRunner;

    #[test]
    fn test_parse_branch_list() {
        let names = parse_branch_list("  bd-1\n* main\n  bd-10\n");
        assert_eq!(names, ["bd-1", "main", "bd-10"]);
    }

    #[tokio::test]
    async fn test_detached_head_is_unknown() {
        let runner = FakeRunner::new().respond("git branch --show-current", "");
        let git = Git::new(&runner, None);
        assert!(git.current_branch().await.is_unknown());
    }

    #[tokio::test]
    async fn test_empty_ls_remote_means_not_pushed() {
        let runner = FakeRunner::new()
            .respond("git ls-remote --heads origin bd-1", "")
            .respond("git ls-remote --heads origin bd-2", "abc123\trefs/heads/bd-2");
        let git = Git::new(&runner, None);
        assert_eq!(git.remote_branch_exists("bd-1").await, Probe::Known(false));
        assert_eq!(git.remote_branch_exists("bd-2").await, Probe::Known(true));
        assert!(git.remote_branch_exists("bd-3").await.is_unknown());
    }

    #[tokio::test]
    async fn test_clean_status() {
        let runner = FakeRunner::new().respond("git status --porcelain", "");
        assert_eq!(Git::new(&runner, None).is_dirty().await, Probe::Known(false));
    }
}
