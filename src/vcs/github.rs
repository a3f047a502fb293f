//! Pull request queries through the `gh` CLI.

use std::path::Path;

use serde::Deserialize;

use crate::probe::{CommandRunner, Probe};

const GH: &str = "gh";

/// Open pull request as listed by `gh pr list --json number,title,headRefName`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub head_ref_name: String,
}

#[derive(Clone, Copy)]
pub struct GitHub<'a> {
    runner: &'a dyn CommandRunner,
    dir: Option<&'a Path>,
}

impl std::fmt::Debug for GitHub<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub").field("dir", &self.dir).finish()
    }
}

impl<'a> GitHub<'a> {
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner, dir: Option<&'a Path>) -> Self {
        Self { runner, dir }
    }

    /// Whether a merged PR exists with `branch` as its head.
    pub async fn has_merged_pr(&self, branch: &str) -> Probe<bool> {
        self.runner
            .probe(
                GH,
                &[
                    "pr", "list", "--head", branch, "--state", "merged", "--json", "number",
                    "--jq", ".[0].number",
                ],
                self.dir,
            )
            .await
            .non_empty()
    }

    /// The current user's open PRs.
    pub async fn my_open_prs(&self) -> Probe<Vec<PullRequest>> {
        self.runner
            .probe(
                GH,
                &[
                    "pr",
                    "list",
                    "--author",
                    "@me",
                    "--state",
                    "open",
                    "--json",
                    "number,title,headRefName",
                ],
                self.dir,
            )
            .await
            .json()
    }
}
