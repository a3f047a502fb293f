//! Hook handler that runs an event's rule pipeline.

use super::context::HookContext;
use super::diagnostics::fail_open;
use super::event::HookEvent;
use super::input::HookInput;
use super::output::HookOutput;
use super::rules::{rules_for, RuleOutcome};

/// Handler for Claude Code hook events.
///
/// Rules run in registration order. Injected text accumulates; the first
/// deny, ask, block or warning replaces it and ends the pipeline. A rule
/// that fails is recorded in the diagnostic log and treated as passing.
#[derive(Debug)]
pub struct HookHandler {
    ctx: HookContext,
}

impl HookHandler {
    #[must_use]
    pub fn new(ctx: HookContext) -> Self {
        Self { ctx }
    }

    #[must_use]
    pub fn context(&self) -> &HookContext {
        &self.ctx
    }

    /// Parse a raw stdin payload and handle it. Unparsable input is the
    /// empty envelope.
    pub async fn handle_json(&self, event: HookEvent, raw: &str) -> HookOutput {
        self.handle(event, &HookInput::from_json(raw)).await
    }

    pub async fn handle(&self, event: HookEvent, input: &HookInput) -> HookOutput {
        let mut injected = String::new();

        for rule in rules_for(event) {
            let outcome = fail_open(
                self.ctx.errors(),
                rule.name(),
                rule.evaluate(input, &self.ctx).await,
            )
            .unwrap_or(RuleOutcome::Pass);

            match outcome {
                RuleOutcome::Pass => {}
                RuleOutcome::Inject(text) => injected.push_str(&text),
                verdict => {
                    tracing::info!(event = %event, rule = rule.name(), outcome = ?verdict, "Rule verdict");
                    if let Some(output) = HookOutput::from_verdict(verdict) {
                        return output;
                    }
                }
            }
        }

        HookOutput::fallthrough(event, injected)
    }
}
