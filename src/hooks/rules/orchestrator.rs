//! Restrictions on the orchestrator session, which investigates and
//! delegates but does not implement.

use std::sync::LazyLock;

use regex::Regex;

use crate::hooks::{HookContext, HookInput};
use crate::probe::Probe;
use crate::worktree::{contains_path_segment, file_name};

use super::branch::PLANS_SEGMENT;
use super::{text_size, RuleOutcome};

/// MCP tool that delegates to Codex-backed agents.
pub const DELEGATE_TOOL: &str = "mcp__provider_delegator__invoke_agent";

/// Files the orchestrator may always edit, by file name.
const ALWAYS_EDITABLE: &[&str] = &["CLAUDE.md", "CLAUDE.local.md", "git-issues.md"];

static SHORT_NO_VERIFY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" -n\b").expect("valid regex"));

pub(super) async fn orchestrator_gate(input: &HookInput, ctx: &HookContext) -> RuleOutcome {
    match input.tool_name.as_str() {
        "Edit" | "Write" => edit_gate(input, ctx).await,
        "NotebookEdit" => RuleOutcome::Deny(format!(
            "Tool '{}' blocked. Orchestrators investigate and delegate via Task(). Supervisors implement.",
            input.tool_name
        )),
        DELEGATE_TOOL => delegate_gate(input, ctx),
        "Bash" => bash_gate(input.tool_input_str("command")),
        _ => RuleOutcome::Pass,
    }
}

fn is_always_editable(file_path: &str, worktrees: &str) -> bool {
    if contains_path_segment(file_path, PLANS_SEGMENT)
        || ALWAYS_EDITABLE.contains(&file_name(file_path))
        || contains_path_segment(file_path, worktrees)
    {
        return true;
    }
    let normalised = file_path.replace('\\', "/");
    contains_path_segment(file_path, "memory") && normalised.contains(".claude")
}

async fn edit_gate(input: &HookInput, ctx: &HookContext) -> RuleOutcome {
    let file_path = input.tool_input_str("file_path");
    if is_always_editable(file_path, &ctx.config().worktree.dir) {
        return RuleOutcome::Pass;
    }

    let Probe::Known(branch) = ctx.git().current_branch().await else {
        tracing::debug!("Branch unknown, allowing orchestrator edit");
        return RuleOutcome::Pass;
    };

    if ctx.config().branches.is_protected(&branch) {
        return RuleOutcome::Deny(format!(
            "Cannot edit files on {branch} branch.\n\n\
             For quick fixes (<10 lines):\n  \
             git checkout -b quick-fix-description\n  \
             Then retry the edit (you'll be prompted for approval)\n\n\
             For larger changes:\n  \
             Use the full bead workflow with supervisors."
        ));
    }

    RuleOutcome::Ask(format!(
        "Quick fix on branch '{branch}'?\n  \
         File: {}\n  \
         Change: {}\n\n\
         Approve for trivial changes (<10 lines).\n\
         Deny to use full bead workflow instead.",
        file_name(file_path),
        change_summary(input)
    ))
}

/// Size of the pending change, e.g. `~3 lines (12 → 40 chars)`.
fn change_summary(input: &HookInput) -> String {
    let lines = |s: &str| if s.is_empty() { 0 } else { text_size(s).0 };
    if input.tool_name == "Edit" {
        let old = input.tool_input_str("old_string");
        let new = input.tool_input_str("new_string");
        format!(
            "~{} lines ({} \u{2192} {} chars)",
            lines(new),
            old.chars().count(),
            new.chars().count()
        )
    } else {
        format!("~{} lines (new file)", lines(input.tool_input_str("content")))
    }
}

fn delegate_gate(input: &HookInput, ctx: &HookContext) -> RuleOutcome {
    let agent = input.tool_input_str("agent");
    if ctx.config().delegation.codex_agents.iter().any(|a| a == agent) {
        return RuleOutcome::Pass;
    }
    RuleOutcome::Deny(format!(
        "Agent '{agent}' cannot be invoked via Codex. Implementation agents (*-supervisor, discovery) \
         must use Task() with BEAD_ID for beads workflow."
    ))
}

fn bash_gate(command: &str) -> RuleOutcome {
    let mut words = command.split_whitespace();
    match words.next() {
        Some("git") if command.contains("--no-verify") || SHORT_NO_VERIFY.is_match(command) => {
            RuleOutcome::Deny(
                "git commit --no-verify is blocked.\n\n\
                 Pre-commit hooks exist for a reason (type-check, lint, tests).\n\
                 Run the commit without --no-verify and fix any issues."
                    .to_string(),
            )
        }
        Some("bd") if matches!(words.next(), Some("create" | "new")) => {
            let described = ["-d ", "--description ", "--description="]
                .iter()
                .any(|flag| command.contains(flag));
            if described {
                RuleOutcome::Pass
            } else {
                RuleOutcome::Deny(
                    "bd create requires description (-d or --description) for supervisor context."
                        .to_string(),
                )
            }
        }
        _ => RuleOutcome::Pass,
    }
}
