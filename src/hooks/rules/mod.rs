//! Policy rules, grouped by the event that runs them.
//!
//! Each rule looks at the envelope and the [`HookContext`] and returns a
//! [`RuleOutcome`]. Rules for one event run in the order listed by
//! [`rules_for`].

mod branch;
mod capture;
mod close;
mod compact;
mod completion;
mod concise;
mod dispatch;
mod dispatch_log;
mod orchestrator;
mod prompt;
mod session_start;
mod tool_gate;

pub use capture::KnowledgeCapture;
pub use close::CloseGate;
pub use compact::CompactNudge;
pub use completion::CompletionCheck;
pub use concise::ConciseResponse;
pub use dispatch::DispatchGate;
pub use dispatch_log::DispatchLog;
pub use prompt::PromptClarity;
pub use session_start::SessionSummary;
pub use tool_gate::ToolGate;

use async_trait::async_trait;

use super::context::HookContext;
use super::error::HookError;
use super::event::HookEvent;
use super::input::HookInput;

/// What a single rule decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Nothing to say.
    Pass,
    /// Append guidance text to the output.
    Inject(String),
    /// Refuse the tool call.
    Deny(String),
    /// Ask the user to confirm the tool call.
    Ask(String),
    /// Refuse to let a subagent stop.
    Block(String),
    /// Non-blocking post-tool warning.
    Warn(String),
}

impl RuleOutcome {
    /// Whether this outcome ends the pipeline.
    #[must_use]
    pub fn is_verdict(&self) -> bool {
        !matches!(self, Self::Pass | Self::Inject(_))
    }
}

#[async_trait]
pub trait Rule: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str;

    async fn evaluate(&self, input: &HookInput, ctx: &HookContext)
        -> Result<RuleOutcome, HookError>;
}

/// Rules registered for an event, in evaluation order.
#[must_use]
pub fn rules_for(event: HookEvent) -> Vec<Box<dyn Rule>> {
    match event {
        HookEvent::PreToolUse => vec![
            Box::new(DispatchGate),
            Box::new(CloseGate),
            Box::new(ToolGate),
        ],
        HookEvent::PostToolUse => vec![
            Box::new(KnowledgeCapture),
            Box::new(DispatchLog),
            Box::new(ConciseResponse),
        ],
        HookEvent::SubagentStop => vec![Box::new(CompletionCheck)],
        HookEvent::SessionStart => vec![Box::new(SessionSummary)],
        HookEvent::UserPromptSubmit => vec![Box::new(PromptClarity)],
        HookEvent::PreCompact => vec![Box::new(CompactNudge)],
    }
}

/// Whether a `subagent_type` names a supervisor.
pub(crate) fn is_supervisor(subagent_type: &str) -> bool {
    subagent_type.contains("supervisor")
}

/// Line and character counts as reported in size warnings.
pub(crate) fn text_size(text: &str) -> (usize, usize) {
    (text.split('\n').count(), text.chars().count())
}
