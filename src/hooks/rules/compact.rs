use std::path::Path;

use async_trait::async_trait;

use crate::hooks::{HookContext, HookError, HookInput};
use crate::knowledge::ClaudeMd;
use crate::probe::Probe;

use super::{Rule, RuleOutcome};

const CURRENT_STATE: &str = "Current State";

const EMPTY_STATE_REMINDER: &str = "CLAUDE.md MAINTENANCE REMINDER:

The \"## Current State\" section in CLAUDE.md is empty. Before this context is compacted, consider updating it with:
- Active work in progress (bead IDs, what's being built)
- Recent architectural decisions or trade-offs made
- Known issues or blockers discovered
- Key files or patterns identified during investigation

This information will persist across sessions and help future investigations.

Update with: Edit CLAUDE.md -> add content under \"## Current State\"
";

const COMPACT_REMINDER: &str = "Context is being compacted. If significant progress was made this session, consider updating CLAUDE.md:
- \"## Current State\" for active work and decisions
- \"## Project Overview\" if project scope became clearer
- \"## Tech Stack\" if new technologies were discovered
";

/// Before compaction, nudges the orchestrator to persist progress in the
/// repository's CLAUDE.md.
#[derive(Debug, Clone, Copy)]
pub struct CompactNudge;

#[async_trait]
impl Rule for CompactNudge {
    fn name(&self) -> &'static str {
        "compact-nudge"
    }

    async fn evaluate(
        &self,
        _input: &HookInput,
        ctx: &HookContext,
    ) -> Result<RuleOutcome, HookError> {
        let Probe::Known(root) = ctx.git().repo_root().await else {
            return Ok(RuleOutcome::Pass);
        };
        let Some(claude_md) = ClaudeMd::load(Path::new(&root)).await else {
            return Ok(RuleOutcome::Pass);
        };

        let text = if claude_md.section_has_content(CURRENT_STATE) {
            COMPACT_REMINDER
        } else {
            EMPTY_STATE_REMINDER
        };
        Ok(RuleOutcome::Inject(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::hooks::rules::test_support::{context, input};
    use crate::probe::FakeRunner;

    fn repo(dir: &Path) -> FakeRunner {
        FakeRunner::new().respond("git rev-parse --show-toplevel", dir.to_string_lossy())
    }

    #[tokio::test]
    async fn test_empty_current_state() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join("CLAUDE.md"),
            "# Project\n\n## Current State\n<!-- fill me in -->\n\n## Tech Stack\nRust\n",
        )
        .unwrap();
        let (ctx, _) = context(temp.path(), repo(temp.path()));

        let outcome = CompactNudge.evaluate(&input(json!({})), &ctx).await.unwrap();
        assert_eq!(outcome, RuleOutcome::Inject(EMPTY_STATE_REMINDER.to_string()));
    }

    #[tokio::test]
    async fn test_filled_current_state() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join("CLAUDE.md"),
            "## Current State\nWorking on bd-4 (cache eviction).\n",
        )
        .unwrap();
        let (ctx, _) = context(temp.path(), repo(temp.path()));

        let outcome = CompactNudge.evaluate(&input(json!({})), &ctx).await.unwrap();
        assert_eq!(outcome, RuleOutcome::Inject(COMPACT_REMINDER.to_string()));
    }

    #[tokio::test]
    async fn test_no_repo_or_no_file() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, _) = context(temp.path(), FakeRunner::new());
        assert_eq!(CompactNudge.evaluate(&input(json!({})), &ctx).await.unwrap(), RuleOutcome::Pass);

        let (ctx, _) = context(temp.path(), repo(temp.path()));
        assert_eq!(CompactNudge.evaluate(&input(json!({})), &ctx).await.unwrap(), RuleOutcome::Pass);
    }
}
