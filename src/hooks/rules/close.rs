//! `bd close` validation: merged PR first, epic children before the epic.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::hooks::{HookContext, HookError, HookInput};
use crate::probe::Probe;

use super::{Rule, RuleOutcome};

static CLOSE_VERB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bd\s+close").expect("valid regex"));
static CLOSE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bd\s+close\s+([A-Za-z0-9._-]+)").expect("valid regex"));

const FORCE_FLAG: &str = "--force";

/// Bead id a `bd close` command targets, unless `--force` was given.
fn closed_bead_id(command: &str) -> Option<&str> {
    if !CLOSE_VERB.is_match(command) || command.contains(FORCE_FLAG) {
        return None;
    }
    CLOSE_ID
        .captures(command)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Clone, Copy)]
pub struct CloseGate;

#[async_trait]
impl Rule for CloseGate {
    fn name(&self) -> &'static str {
        "close-gate"
    }

    async fn evaluate(
        &self,
        input: &HookInput,
        ctx: &HookContext,
    ) -> Result<RuleOutcome, HookError> {
        if input.tool_name != "Bash" {
            return Ok(RuleOutcome::Pass);
        }
        let Some(bead_id) = closed_bead_id(input.tool_input_str("command")) else {
            return Ok(RuleOutcome::Pass);
        };

        let branch = ctx.config().worktree.branch_for(bead_id);
        let git = ctx.git();
        if git.origin_url().await.known().is_some()
            && git.remote_branch_exists(&branch).await == Probe::Known(true)
            && ctx.github().has_merged_pr(&branch).await == Probe::Known(false)
        {
            return Ok(RuleOutcome::Deny(format!(
                "Cannot close bead '{bead_id}' - branch '{branch}' has no merged PR. \
                 Create and merge a PR first, or use 'bd close {bead_id} --force' to override."
            )));
        }

        let bd = ctx.beads();
        let Probe::Known(Some(bead)) = bd.show(bead_id).await else {
            return Ok(RuleOutcome::Pass);
        };
        if !bead.is_epic() {
            return Ok(RuleOutcome::Pass);
        }
        let Probe::Known(all) = bd.list_all().await else {
            return Ok(RuleOutcome::Pass);
        };

        let prefix = format!("{bead_id}.");
        let incomplete: Vec<String> = all
            .iter()
            .filter(|b| b.id.starts_with(&prefix) && !b.is_finished())
            .map(|b| format!("{} ({})", b.id, b.status()))
            .collect();

        if incomplete.is_empty() {
            return Ok(RuleOutcome::Pass);
        }
        tracing::info!(epic = %bead_id, incomplete = incomplete.len(), "Epic close denied");
        Ok(RuleOutcome::Deny(format!(
            "Cannot close epic '{bead_id}' - has {} incomplete children: {}. \
             Mark all children as done first.",
            incomplete.len(),
            incomplete.join(", ")
        )))
    }
}
