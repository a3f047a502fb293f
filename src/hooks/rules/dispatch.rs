//! Supervisor dispatch validation for `Task` calls.

use std::path::Path;

use async_trait::async_trait;

use crate::beads::{epic_of, is_epic_child, parse_bead_id, BEAD_ID_MARKER};
use crate::hooks::{HookContext, HookError, HookInput};
use crate::probe::Probe;

use super::{is_supervisor, Rule, RuleOutcome};

/// Supervisor exempt from bead tracking.
const MERGE_SUPERVISOR: &str = "merge-supervisor";

const BEAD_REQUIRED: &str = "<bead-required>
All supervisor work MUST be tracked with a bead.

<action>
For standalone tasks:
  1. bd create \"Task title\" -d \"Description\"
  2. Dispatch with: BEAD_ID: {id}

For epic children:
  1. bd create \"Epic\" -d \"...\" --type epic
  2. bd create \"Child\" -d \"...\" --parent {EPIC_ID}
  3. Dispatch with: BEAD_ID: {child_id}, EPIC_ID: {epic_id}
</action>

Each task creates its own worktree at .worktrees/bd-{BEAD_ID}/
</bead-required>";

const IN_PROGRESS_REMINDER: &str =
    "IMPORTANT: Before dispatching, ensure bead is in_progress: bd update {BEAD_ID} --status in_progress\n";

const DISCIPLINE_REMINDER: &str = "<system-reminder>
SUPERVISOR DISPATCH: Before implementing, invoke `/subagents-discipline` skill.
This ensures verification-first development with DEMO blocks.
</system-reminder>
";

/// Gate on `Task` dispatches to supervisors: the prompt must name an open,
/// unblocked bead, and an epic child's design doc must exist.
#[derive(Debug, Clone, Copy)]
pub struct DispatchGate;

#[async_trait]
impl Rule for DispatchGate {
    fn name(&self) -> &'static str {
        "dispatch-gate"
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

        if !is_supervisor(subagent_type) || subagent_type == MERGE_SUPERVISOR {
            return Ok(RuleOutcome::Pass);
        }
        if !prompt.contains(BEAD_ID_MARKER) {
            return Ok(RuleOutcome::Deny(BEAD_REQUIRED.to_string()));
        }
        let Some(bead_id) = parse_bead_id(prompt) else {
            return Ok(RuleOutcome::Pass);
        };

        if subagent_type.contains("worker") {
            return Ok(RuleOutcome::Inject(guidance(subagent_type)));
        }

        let bd = ctx.beads();
        if let Probe::Known(Some(bead)) = bd.show(bead_id).await {
            if bead.is_finished() {
                tracing::info!(bead = %bead_id, status = %bead.status(), "Dispatch to finished bead denied");
                return Ok(RuleOutcome::Deny(closed_bead(bead_id, bead.status())));
            }
        }

        if is_epic_child(bead_id) {
            let epic_id = epic_of(bead_id);

            if let Probe::Known(deps) = bd.deps(bead_id).await {
                let blockers: Vec<&str> = deps
                    .iter()
                    .filter(|d| d.id != epic_id && !d.is_finished())
                    .map(|d| d.id.as_str())
                    .collect();
                if !blockers.is_empty() {
                    return Ok(RuleOutcome::Deny(blocked_task(bead_id, &blockers)));
                }
            }

            if let Probe::Known(Some(epic)) = bd.show(epic_id).await {
                if let Some(design) = epic.design_path() {
                    if is_missing(&ctx.cwd().join(design)).await {
                        return Ok(RuleOutcome::Deny(design_missing(epic_id, design)));
                    }
                }
            }
        }

        Ok(RuleOutcome::Inject(guidance(subagent_type)))
    }
}

/// Soft reminders emitted on every accepted supervisor dispatch.
fn guidance(subagent_type: &str) -> String {
    let mut text = IN_PROGRESS_REMINDER.to_string();
    if subagent_type.contains("-supervisor") {
        text.push_str(DISCIPLINE_REMINDER);
    }
    text
}

/// Only a definite "does not exist" counts; errors fail open.
async fn is_missing(path: &Path) -> bool {
    matches!(tokio::fs::try_exists(path).await, Ok(false))
}

fn closed_bead(bead_id: &str, status: &str) -> String {
    format!(
        "<closed-bead>\nBead {bead_id} is already {status}. Do not reopen closed beads.\n\n\
         Create a new bead for follow-up work and relate it:\n\n  \
         bd create \"Fix: [description]\" -d \"Follow-up to {bead_id}: [details]\"\n  \
         # Returns: {{NEW_ID}}\n  \
         bd dep relate {{NEW_ID}} {bead_id}\n\n\
         Then dispatch with the NEW bead ID.\n</closed-bead>"
    )
}

fn blocked_task(bead_id: &str, blockers: &[&str]) -> String {
    format!(
        "<blocked-task>\nCannot dispatch {bead_id} - unresolved blockers: {}\n\n\
         Complete blocking tasks first, then dispatch this one.\n\n\
         Use: bd ready --json to see tasks with no blockers.\n</blocked-task>",
        blockers.join(", ")
    )
}

fn design_missing(epic_id: &str, design: &str) -> String {
    format!(
        "<design-doc-missing>\nEpic {epic_id} has design path '{design}' but file doesn't exist.\n\n\
         <stop-and-think>\nBefore dispatching architect, verify you fully understand the epic:\n\n\
         1. Are the requirements clear and unambiguous?\n\
         2. Do you know the expected inputs/outputs?\n\
         3. Are there edge cases or constraints to consider?\n\
         4. Do you understand how this integrates with existing code?\n\n\
         If ANY ambiguity exists -> Use AskUserQuestion to clarify FIRST.\n\
         Do NOT dispatch architect with vague requirements.\n\
         </stop-and-think>\n\n\
         <next-steps>\nIf requirements are CLEAR:\n  \
         Task(\n    subagent_type=\"architect\",\n    \
         prompt=\"Create design doc for EPIC_ID: {epic_id}\n           \
         Output: {design}\n           \n           \
         [Provide clear, specific requirements]\"\n  )\n\n\
         If requirements are UNCLEAR:\n  \
         AskUserQuestion(\n    questions=[{{\n      \
         \"question\": \"[Your specific clarifying question]\",\n      \
         \"header\": \"Clarify\",\n      \
         \"options\": [...],\n      \
         \"multiSelect\": false\n    }}]\n  )\n\
         </next-steps>\n</design-doc-missing>"
    )
}
