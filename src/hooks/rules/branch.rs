//! Branch discipline for subagents: edits happen in worktrees, never on a
//! protected branch of the main checkout.

use crate::hooks::{HookContext, HookInput};
use crate::probe::Probe;
use crate::worktree::contains_path_segment;

use super::RuleOutcome;

/// Plan-mode files are always editable.
pub(super) const PLANS_SEGMENT: &str = ".claude/plans";

/// `Edit`/`Write` from a subagent.
pub(super) async fn branch_guard(input: &HookInput, ctx: &HookContext) -> RuleOutcome {
    if !matches!(input.tool_name.as_str(), "Edit" | "Write") {
        return RuleOutcome::Pass;
    }

    let worktrees = ctx.config().worktree.dir.as_str();
    let file_path = input.tool_input_str("file_path");
    let cwd = if input.cwd.is_empty() {
        ctx.cwd().to_string_lossy().into_owned()
    } else {
        input.cwd.clone()
    };

    if contains_path_segment(file_path, PLANS_SEGMENT)
        || contains_path_segment(file_path, worktrees)
        || contains_path_segment(&cwd, worktrees)
    {
        return RuleOutcome::Pass;
    }

    match ctx.git().current_branch().await {
        Probe::Known(branch) if ctx.config().branches.is_protected(&branch) => {
            let prefix = &ctx.config().worktree.branch_prefix;
            RuleOutcome::Deny(format!(
                "Cannot edit files on {branch} branch. Supervisors must work in worktrees.\n\n\
                 Create a worktree first:\n  \
                 git worktree add {worktrees}/{prefix}{{BEAD_ID}} -b {prefix}{{BEAD_ID}}\n\n\
                 Then cd into {worktrees}/{prefix}{{BEAD_ID}}/ to make changes."
            ))
        }
        _ => RuleOutcome::Pass,
    }
}
