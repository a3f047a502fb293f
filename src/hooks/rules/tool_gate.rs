//! Routes non-`Task` tool calls to the subagent or orchestrator policy.

use std::path::Path;

use async_trait::async_trait;

use crate::hooks::{HookContext, HookError, HookInput};
use crate::transcript::is_subagent_call;

use super::branch::branch_guard;
use super::orchestrator::orchestrator_gate;
use super::{Rule, RuleOutcome};

/// Subagents get the branch guard; the main session gets the orchestrator
/// restrictions. `Task` itself is always allowed here.
#[derive(Debug, Clone, Copy)]
pub struct ToolGate;

#[async_trait]
impl Rule for ToolGate {
    fn name(&self) -> &'static str {
        "tool-gate"
    }

    async fn evaluate(
        &self,
        input: &HookInput,
        ctx: &HookContext,
    ) -> Result<RuleOutcome, HookError> {
        if input.tool_name.is_empty() || input.tool_name == "Task" {
            return Ok(RuleOutcome::Pass);
        }

        let from_subagent = !input.transcript_path.is_empty()
            && !input.tool_use_id.is_empty()
            && is_subagent_call(Path::new(&input.transcript_path), &input.tool_use_id).await;

        if from_subagent {
            tracing::debug!(tool = %input.tool_name, "Tool call from subagent");
            Ok(branch_guard(input, ctx).await)
        } else {
            Ok(orchestrator_gate(input, ctx).await)
        }
    }
}
