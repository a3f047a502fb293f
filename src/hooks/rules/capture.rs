use async_trait::async_trait;

use crate::hooks::{HookContext, HookError, HookInput};
use crate::knowledge::{capture, CaptureContext};

use super::{Rule, RuleOutcome};

/// Appends `LEARNED:` annotations from `bd comment` commands to the
/// knowledge log. Never produces output.
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeCapture;

#[async_trait]
impl Rule for KnowledgeCapture {
    fn name(&self) -> &'static str {
        "memory-capture"
    }

    async fn evaluate(
        &self,
        input: &HookInput,
        ctx: &HookContext,
    ) -> Result<RuleOutcome, HookError> {
        if input.tool_name != "Bash" {
            return Ok(RuleOutcome::Pass);
        }

        let config = ctx.config();
        let capture_ctx = CaptureContext {
            cwd: &input.cwd,
            worktree_dir: &config.worktree.dir,
            ts: ctx.now(),
        };
        capture(
            &ctx.knowledge_store(),
            &config.knowledge,
            input.tool_input_str("command"),
            &capture_ctx,
        )?;
        Ok(RuleOutcome::Pass)
    }
}
