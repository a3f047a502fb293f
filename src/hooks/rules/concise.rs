use async_trait::async_trait;

use crate::hooks::{HookContext, HookError, HookInput};

use super::{text_size, Rule, RuleOutcome};

/// Warns when a subagent's `Task` result is longer than the configured
/// report size.
#[derive(Debug, Clone, Copy)]
pub struct ConciseResponse;

#[async_trait]
impl Rule for ConciseResponse {
    fn name(&self) -> &'static str {
        "concise-response"
    }

    async fn evaluate(
        &self,
        input: &HookInput,
        ctx: &HookContext,
    ) -> Result<RuleOutcome, HookError> {
        if input.tool_name != "Task" {
            return Ok(RuleOutcome::Pass);
        }
        let response = input.tool_result_text();
        if response.is_empty() {
            return Ok(RuleOutcome::Pass);
        }

        let limits = &ctx.config().limits;
        let (lines, chars) = text_size(&response);
        if lines <= limits.subagent_response_lines && chars <= limits.subagent_response_chars {
            return Ok(RuleOutcome::Pass);
        }
        Ok(RuleOutcome::Warn(format!(
            "Subagent response exceeded limits ({lines} lines, {chars} chars). \
             Target: {} lines, {} chars. Consider asking agents for more concise reports.",
            limits.subagent_response_lines, limits.subagent_response_chars
        )))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::hooks::rules::test_support::{context, input};
    use crate::probe::FakeRunner;

    #[tokio::test]
    async fn test_long_response_warns() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, _) = context(temp.path(), FakeRunner::new());
        let result = vec!["line"; 12].join("\n");
        let task = input(json!({"tool_name": "Task", "tool_result": result}));

        let outcome = ConciseResponse.evaluate(&task, &ctx).await.unwrap();
        assert_eq!(
            outcome,
            RuleOutcome::Warn(
                "Subagent response exceeded limits (12 lines, 59 chars). Target: 10 lines, 500 chars. \
                 Consider asking agents for more concise reports."
                    .to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_structured_response_measured() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, _) = context(temp.path(), FakeRunner::new());
        let long = "x".repeat(501);
        let task = input(json!({
            "tool_name": "Task",
            "tool_response": {"content": [{"type": "text", "text": long}]}
        }));
        assert!(matches!(ConciseResponse.evaluate(&task, &ctx).await.unwrap(), RuleOutcome::Warn(_)));
    }

    #[tokio::test]
    async fn test_short_or_missing_response_passes() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, _) = context(temp.path(), FakeRunner::new());
        let short = input(json!({"tool_name": "Task", "tool_result": "BEAD bd-1 COMPLETE"}));
        assert_eq!(ConciseResponse.evaluate(&short, &ctx).await.unwrap(), RuleOutcome::Pass);

        let missing = input(json!({"tool_name": "Task"}));
        assert_eq!(ConciseResponse.evaluate(&missing, &ctx).await.unwrap(), RuleOutcome::Pass);
    }
}
