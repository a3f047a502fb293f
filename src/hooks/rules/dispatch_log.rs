use async_trait::async_trait;

use crate::beads::parse_bead_id;
use crate::hooks::{HookContext, HookError, HookInput};
use crate::knowledge::truncate_chars;

use super::{is_supervisor, Rule, RuleOutcome};

/// Records each supervisor dispatch prompt as a comment on its bead.
#[derive(Debug, Clone, Copy)]
pub struct DispatchLog;

#[async_trait]
impl Rule for DispatchLog {
    fn name(&self) -> &'static str {
        "dispatch-log"
    }

    async fn evaluate(
        &self,
        input: &HookInput,
        ctx: &HookContext,
    ) -> Result<RuleOutcome, HookError> {
        if input.tool_name != "Task" {
            return Ok(RuleOutcome::Pass);
        }
        let subagent_type = input.tool_input_str("subagent_type");
        let prompt = input.tool_input_str("prompt");
        if !is_supervisor(subagent_type) || prompt.is_empty() {
            return Ok(RuleOutcome::Pass);
        }
        let Some(bead_id) = parse_bead_id(prompt) else {
            return Ok(RuleOutcome::Pass);
        };

        let body = format!(
            "DISPATCH_PROMPT [{subagent_type}]:\n\n{}",
            truncate_chars(prompt, ctx.config().limits.dispatch_prompt_chars)
        );
        if ctx.beads().comment(bead_id, &body).await.is_unknown() {
            tracing::debug!(bead = %bead_id, "Dispatch prompt not logged");
        }
        Ok(RuleOutcome::Pass)
    }
}
