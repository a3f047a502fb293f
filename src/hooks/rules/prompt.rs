use async_trait::async_trait;

use crate::hooks::{HookContext, HookError, HookInput};

use super::{Rule, RuleOutcome};

const TOO_SHORT: &str = "<system-reminder>
STOP. This request is too short to act on safely.

BEFORE doing anything else, you MUST use the AskUserQuestion tool to clarify:
- What specific outcome does the user want?
- What files/components are involved?
- Are there any constraints or preferences?

Do NOT guess. Do NOT start working. Ask first.
</system-reminder>
";

const MAYBE_AMBIGUOUS: &str = "<system-reminder>
This request may be ambiguous. Consider using AskUserQuestion to clarify before proceeding.
</system-reminder>
";

const CROSS_DOMAIN: &str = "<cross-domain-check>
CRITICAL: If this task spans multiple supervisors, you MUST create an EPIC.
Cross-domain = Epic. No exceptions.
</cross-domain-check>
";

/// Reminds the orchestrator to clarify short prompts, and to open an epic
/// for work that spans supervisors.
#[derive(Debug, Clone, Copy)]
pub struct PromptClarity;

#[async_trait]
impl Rule for PromptClarity {
    fn name(&self) -> &'static str {
        "prompt-clarity"
    }

    async fn evaluate(
        &self,
        input: &HookInput,
        ctx: &HookContext,
    ) -> Result<RuleOutcome, HookError> {
        let limits = &ctx.config().limits;
        let length = input.prompt.chars().count();

        let mut text = String::new();
        if length < limits.short_prompt_chars {
            text.push_str(TOO_SHORT);
        } else if length < limits.ambiguous_prompt_chars {
            text.push_str(MAYBE_AMBIGUOUS);
        }
        text.push_str(CROSS_DOMAIN);
        Ok(RuleOutcome::Inject(text))
    }
}
