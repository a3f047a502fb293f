//! Typed wrappers over `bd` subcommands.

use std::path::Path;

use crate::probe::{CommandRunner, Probe};

use super::record::BeadRecord;

const BD: &str = "bd";

/// `bd` invoked through a [`CommandRunner`].
#[derive(Clone, Copy)]
pub struct BeadsClient<'a> {
    runner: &'a dyn CommandRunner,
    cwd: Option<&'a Path>,
}

impl std::fmt::Debug for BeadsClient<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeadsClient").field("cwd", &self.cwd).finish()
    }
}

impl<'a> BeadsClient<'a> {
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner, cwd: Option<&'a Path>) -> Self {
        Self { runner, cwd }
    }

    async fn run(&self, args: &[&str]) -> Probe<String> {
        self.runner.probe(BD, args, self.cwd).await
    }

    /// `bd --version`; `Unknown` when the CLI is not installed.
    pub async fn version(&self) -> Probe<String> {
        self.run(&["--version"]).await
    }

    /// `bd show <id> --json`. The CLI prints an array; the first element is
    /// the record. `Known(None)` means the call worked but returned nothing.
    pub async fn show(&self, id: &str) -> Probe<Option<BeadRecord>> {
        self.run(&["show", id, "--json"])
            .await
            .json::<Vec<BeadRecord>>()
            .map(|records| records.into_iter().next())
    }

    /// `bd dep list <id> --json`.
    pub async fn deps(&self, id: &str) -> Probe<Vec<BeadRecord>> {
        self.run(&["dep", "list", id, "--json"]).await.json()
    }

    /// `bd list --json`.
    pub async fn list_all(&self) -> Probe<Vec<BeadRecord>> {
        self.run(&["list", "--json"]).await.json()
    }

    /// Post a comment on a bead.
    pub async fn comment(&self, id: &str, body: &str) -> Probe<String> {
        self.run(&["comment", id, body]).await
    }

    /// Human-readable listing, e.g. `bd ready` or `bd stale --days 3`.
    pub async fn listing(&self, args: &[&str]) -> Probe<String> {
        self.run(args).await
    }
}
