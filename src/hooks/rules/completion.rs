//! Work verification when a subagent stops.
//!
//! Supervisors must leave a completion report, a bead comment, a clean and
//! pushed worktree, and a bead in review. Other agents are only checked if
//! they claim completion themselves.

use std::path::Path;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::beads::IN_REVIEW;
use crate::hooks::{HookContext, HookError, HookInput};
use crate::probe::Probe;
use crate::transcript::{self, LAST_RESPONSE_WINDOW};
use crate::worktree::worktree_path;

use super::{is_supervisor, text_size, Rule, RuleOutcome};

static BEAD_COMPLETE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"BEAD.*COMPLETE").expect("valid regex"));
static WORKTREE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(Worktree:|Branch:).*bd-").expect("valid regex"));
static REPORTED_BEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"BEAD\s+([A-Za-z0-9._-]+)").expect("valid regex"));

const REPORT_MISSING: &str = "Work verification failed: completion report missing.

Required format:
BEAD {BEAD_ID} COMPLETE
Worktree: .worktrees/bd-{BEAD_ID}
Files: [list]
Tests: pass
Summary: [1 sentence]";

const NO_COMMENT: &str =
    "Work verification failed: no comment on bead.\n\nRun: bd comment {BEAD_ID} \"Completed: [summary]\"";

const NO_WORKTREE: &str =
    "Work verification failed: worktree not found.\n\nCreate worktree first via API.";

const UNCOMMITTED: &str = "Work verification failed: uncommitted changes.\n\n\
                           Run in worktree:\n  git add -A && git commit -m \"...\"";

const NOT_PUSHED: &str =
    "Work verification failed: branch not pushed.\n\nRun: git push -u origin bd-{BEAD_ID}";

fn has_completion_report(response: &str) -> bool {
    BEAD_COMPLETE.is_match(response) && WORKTREE_LINE.is_match(response)
}

fn reported_bead(response: &str) -> Option<&str> {
    REPORTED_BEAD
        .captures(response)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

#[derive(Debug, Clone, Copy)]
pub struct CompletionCheck;

#[async_trait]
impl Rule for CompletionCheck {
    fn name(&self) -> &'static str {
        "completion-check"
    }

    async fn evaluate(
        &self,
        input: &HookInput,
        ctx: &HookContext,
    ) -> Result<RuleOutcome, HookError> {
        if input.agent_transcript_path.is_empty() {
            return Ok(RuleOutcome::Pass);
        }
        let agent_transcript = Path::new(&input.agent_transcript_path);
        if !matches!(tokio::fs::try_exists(agent_transcript).await, Ok(true)) {
            return Ok(RuleOutcome::Pass);
        }

        let subagent_type =
            transcript::subagent_type(Path::new(&input.transcript_path), &input.agent_id).await;
        if subagent_type.contains("worker") {
            return Ok(RuleOutcome::Pass);
        }

        let response = transcript::last_assistant_text(agent_transcript, LAST_RESPONSE_WINDOW).await;
        let reported = has_completion_report(&response);
        if !reported {
            if is_supervisor(&subagent_type) {
                return Ok(RuleOutcome::Block(REPORT_MISSING.to_string()));
            }
            return Ok(RuleOutcome::Pass);
        }
        tracing::debug!(subagent_type = %subagent_type, "Verifying completion report");

        match transcript::contains(agent_transcript, "bd comment").await {
            Ok(true) => {}
            Ok(false) => return Ok(RuleOutcome::Block(NO_COMMENT.to_string())),
            Err(source) => {
                return Err(HookError::Read {
                    path: agent_transcript.to_path_buf(),
                    source,
                })
            }
        }

        let bead_id = reported_bead(&response);
        if let Some(bead_id) = bead_id {
            if let Some(reason) = verify_worktree(ctx, bead_id).await {
                return Ok(RuleOutcome::Block(reason));
            }
            if let Probe::Known(Some(bead)) = ctx.beads().show(bead_id).await {
                let status = match bead.status() {
                    "" => "unknown",
                    s => s,
                };
                if status != IN_REVIEW {
                    return Ok(RuleOutcome::Block(format!(
                        "Work verification failed: bead status is '{status}'.\n\n\
                         Run: bd update {bead_id} --status {IN_REVIEW}"
                    )));
                }
            }
        }

        let limits = &ctx.config().limits;
        let (lines, chars) = text_size(&response);
        if lines > limits.completion_lines || chars > limits.completion_chars {
            return Ok(RuleOutcome::Block(format!(
                "Work verification failed: response too verbose ({lines} lines, {chars} chars). \
                 Max: {} lines, {} chars.",
                limits.completion_lines, limits.completion_chars
            )));
        }

        Ok(RuleOutcome::Pass)
    }
}

/// The bead's worktree must exist, be clean and, when there is a remote,
/// be pushed. Returns the block reason for the first failed check.
async fn verify_worktree(ctx: &HookContext, bead_id: &str) -> Option<String> {
    let Probe::Known(root) = ctx.git().repo_root().await else {
        return None;
    };
    let config = &ctx.config().worktree;
    let path = worktree_path(Path::new(&root), config, bead_id);

    if matches!(tokio::fs::try_exists(&path).await, Ok(false)) {
        return Some(NO_WORKTREE.to_string());
    }

    let git = ctx.git();
    let git = git.at(&path);
    if git.is_dirty().await == Probe::Known(true) {
        return Some(UNCOMMITTED.to_string());
    }
    if git.origin_url().await.known().is_some()
        && git.remote_branch_exists(&config.branch_for(bead_id)).await == Probe::Known(false)
    {
        return Some(NOT_PUSHED.to_string());
    }
    None
}
