//! Hook responses printed to stdout.

use serde::{Deserialize, Serialize};

use super::event::HookEvent;
use super::rules::RuleOutcome;

/// Decision for a `PreToolUse` hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionDecision {
    Deny,
    Ask,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreToolUseOutput {
    pub hook_event_name: String,
    pub permission_decision: PermissionDecision,
    pub permission_decision_reason: String,
}

/// Response from a `PreToolUse` hook wrapped in hookSpecificOutput.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreToolUseResponse {
    pub hook_specific_output: PreToolUseOutput,
}

impl PreToolUseResponse {
    fn with(decision: PermissionDecision, reason: impl Into<String>) -> Self {
        Self {
            hook_specific_output: PreToolUseOutput {
                hook_event_name: HookEvent::PreToolUse.name().to_string(),
                permission_decision: decision,
                permission_decision_reason: reason.into(),
            },
        }
    }

    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::with(PermissionDecision::Deny, reason)
    }

    #[must_use]
    pub fn ask(reason: impl Into<String>) -> Self {
        Self::with(PermissionDecision::Ask, reason)
    }

    #[must_use]
    pub fn decision(&self) -> PermissionDecision {
        self.hook_specific_output.permission_decision
    }
}

/// Decision for a `SubagentStop` hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopDecision {
    Approve,
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubagentStopResponse {
    pub decision: StopDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SubagentStopResponse {
    #[must_use]
    pub fn approve() -> Self {
        Self {
            decision: StopDecision::Approve,
            reason: None,
        }
    }

    #[must_use]
    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            decision: StopDecision::Block,
            reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostToolUseOutput {
    pub hook_event_name: String,
    pub warning: String,
}

/// Non-blocking warning after a tool ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostToolUseResponse {
    pub hook_specific_output: PostToolUseOutput,
}

impl PostToolUseResponse {
    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            hook_specific_output: PostToolUseOutput {
                hook_event_name: HookEvent::PostToolUse.name().to_string(),
                warning: text.into(),
            },
        }
    }
}

/// The single thing a hook invocation prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutput {
    /// Print nothing.
    Silent,
    /// Raw text injected into the conversation.
    Text(String),
    PreToolUse(PreToolUseResponse),
    SubagentStop(SubagentStopResponse),
    PostToolUse(PostToolUseResponse),
}

impl HookOutput {
    /// Output for a terminal rule outcome. `Pass` and `Inject` are not
    /// terminal and map to `None`.
    #[must_use]
    pub fn from_verdict(outcome: RuleOutcome) -> Option<Self> {
        match outcome {
            RuleOutcome::Pass | RuleOutcome::Inject(_) => None,
            RuleOutcome::Deny(reason) => Some(Self::PreToolUse(PreToolUseResponse::deny(reason))),
            RuleOutcome::Ask(reason) => Some(Self::PreToolUse(PreToolUseResponse::ask(reason))),
            RuleOutcome::Block(reason) => {
                Some(Self::SubagentStop(SubagentStopResponse::block(reason)))
            }
            RuleOutcome::Warn(text) => Some(Self::PostToolUse(PostToolUseResponse::warning(text))),
        }
    }

    /// What to print when no rule produced a verdict.
    #[must_use]
    pub fn fallthrough(event: HookEvent, injected: String) -> Self {
        if event == HookEvent::SubagentStop {
            Self::SubagentStop(SubagentStopResponse::approve())
        } else if injected.is_empty() {
            Self::Silent
        } else {
            Self::Text(injected)
        }
    }

    /// Render for stdout. `None` means print nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if a JSON response cannot be serialized.
    pub fn render(&self) -> Result<Option<String>, serde_json::Error> {
        Ok(match self {
            Self::Silent => None,
            Self::Text(text) => Some(text.clone()),
            Self::PreToolUse(r) => Some(serde_json::to_string(r)?),
            Self::SubagentStop(r) => Some(serde_json::to_string(r)?),
            Self::PostToolUse(r) => Some(serde_json::to_string(r)?),
        })
    }
}
