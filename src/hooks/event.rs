//! Hook events handled by the `hook` subcommand.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    PreToolUse,
    PostToolUse,
    SubagentStop,
    SessionStart,
    UserPromptSubmit,
    PreCompact,
}

impl HookEvent {
    pub const ALL: [Self; 6] = [
        Self::PreToolUse,
        Self::PostToolUse,
        Self::SubagentStop,
        Self::SessionStart,
        Self::UserPromptSubmit,
        Self::PreCompact,
    ];

    /// Event name as used in `settings.json` and hook payloads.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PreToolUse => "PreToolUse",
            Self::PostToolUse => "PostToolUse",
            Self::SubagentStop => "SubagentStop",
            Self::SessionStart => "SessionStart",
            Self::UserPromptSubmit => "UserPromptSubmit",
            Self::PreCompact => "PreCompact",
        }
    }

    /// Argument of `beads-guard hook <arg>`.
    #[must_use]
    pub fn cli_arg(self) -> &'static str {
        match self {
            Self::PreToolUse => "pre-tool-use",
            Self::PostToolUse => "post-tool-use",
            Self::SubagentStop => "subagent-stop",
            Self::SessionStart => "session-start",
            Self::UserPromptSubmit => "user-prompt-submit",
            Self::PreCompact => "pre-compact",
        }
    }

    /// Tool matcher registered for this event, if it is tool-scoped.
    #[must_use]
    pub fn matcher(self) -> Option<&'static str> {
        match self {
            Self::PreToolUse => {
                Some("Edit|Write|NotebookEdit|Bash|Task|mcp__provider_delegator__invoke_agent")
            }
            Self::PostToolUse => Some("Bash|Task"),
            _ => None,
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
