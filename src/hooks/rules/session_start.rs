//! Session-start context: repository hygiene, open work and recent knowledge.

use std::path::Path;

use async_trait::async_trait;

use crate::hooks::{HookContext, HookError, HookInput};
use crate::knowledge::{dedupe_latest, format_summary_line, newest_first};
use crate::probe::Probe;
use crate::worktree::parse_worktree_list;

use super::{Rule, RuleOutcome};

const BEADS_DIR: &str = ".beads";

/// Branch merged worktrees are checked against.
const MERGE_BASE: &str = "main";

/// Knowledge lines scanned and entries shown in the summary.
const KNOWLEDGE_SCAN_LINES: usize = 20;
const KNOWLEDGE_SHOWN: usize = 5;

/// `(heading, bd args, max lines)` for each task status section.
const STATUS_SECTIONS: &[(&str, &[&str], usize)] = &[
    ("### In Progress (resume these):", &["list", "--status", "in_progress"], 5),
    ("### Ready (no blockers):", &["ready"], 5),
    ("### Blocked:", &["blocked"], 3),
    ("### Stale (no activity in 3 days):", &["stale", "--days", "3"], 3),
];

#[derive(Debug, Clone, Copy)]
pub struct SessionSummary;

#[async_trait]
impl Rule for SessionSummary {
    fn name(&self) -> &'static str {
        "session-start"
    }

    async fn evaluate(
        &self,
        _input: &HookInput,
        ctx: &HookContext,
    ) -> Result<RuleOutcome, HookError> {
        let project = ctx.project_dir();
        if !is_dir(&project.join(BEADS_DIR)).await {
            return Ok(RuleOutcome::Inject(
                "No .beads directory found. Run 'bd init' to initialize.\n".to_string(),
            ));
        }
        if ctx.beads().version().await.is_unknown() {
            return Ok(RuleOutcome::Inject(
                "beads CLI (bd) not found. Install from: https://github.com/steveyegge/beads\n"
                    .to_string(),
            ));
        }

        let mut out: Vec<String> = Vec::new();
        repository_notes(ctx, &mut out).await;
        open_prs(ctx, &mut out).await;

        out.extend(["".into(), "## Task Status".into(), "".into()]);
        task_status(ctx, &mut out).await;
        recent_knowledge(ctx, &mut out);

        out.push(String::new());
        Ok(RuleOutcome::Inject(out.join("\n")))
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

/// Dirty main checkout warning and cleanup hints for merged worktrees.
async fn repository_notes(ctx: &HookContext, out: &mut Vec<String>) {
    let git = ctx.git();
    let project_git = git.at(ctx.project_dir());
    let Probe::Known(root) = project_git.repo_root().await else {
        return;
    };
    let root = Path::new(&root);
    let git = git.at(root);

    if git.is_dirty().await == Probe::Known(true) {
        out.push("WARNING: Main directory has uncommitted changes.".into());
        out.push(format!("   Agents should only work in {}/", ctx.config().worktree.dir));
        out.push(String::new());
    }

    let config = &ctx.config().worktree;
    if !is_dir(&ctx.project_dir().join(&config.dir)).await {
        return;
    }
    let Probe::Known(listing) = git.worktree_list().await else {
        return;
    };
    let merged = git.merged_branches(MERGE_BASE).await.known().unwrap_or_default();

    for worktree in parse_worktree_list(&listing) {
        if !worktree.is_bead_worktree(config) || !merged.contains(&worktree.name) {
            continue;
        }
        let bead_id = worktree.bead_id(config).unwrap_or_default();
        out.push(format!("\u{2713} {} was merged - consider cleaning up", worktree.name));
        out.push(format!("   Run: {}", worktree.cleanup_command(bead_id)));
        out.push(String::new());
    }
}

async fn open_prs(ctx: &HookContext, out: &mut Vec<String>) {
    let Probe::Known(prs) = ctx.github().my_open_prs().await else {
        return;
    };
    if prs.is_empty() {
        return;
    }
    out.push("You have open PRs:".into());
    out.extend(
        prs.iter()
            .map(|pr| format!("  #{} {} ({})", pr.number, pr.title, pr.head_ref_name)),
    );
    out.push(String::new());
}

async fn task_status(ctx: &HookContext, out: &mut Vec<String>) {
    let bd = ctx.beads();
    let mut any = false;
    for (heading, args, max_lines) in STATUS_SECTIONS {
        let Probe::Known(listing) = bd.listing(args).await else {
            continue;
        };
        if listing.is_empty() {
            continue;
        }
        any = true;
        out.push((*heading).to_string());
        out.push(listing.split('\n').take(*max_lines).collect::<Vec<_>>().join("\n"));
        out.push(String::new());
    }
    if !any {
        out.push(
            "No active beads. Create one with: bd create \"Task title\" -d \"Description\"".into(),
        );
    }
}

fn recent_knowledge(ctx: &HookContext, out: &mut Vec<String>) {
    let store = ctx.knowledge_store();
    if store.is_empty() {
        return;
    }
    let (total, entries) = match store.tail_active(KNOWLEDGE_SCAN_LINES) {
        Ok(tail) => tail,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping knowledge summary");
            return;
        }
    };
    let top: Vec<_> = newest_first(dedupe_latest(entries))
        .into_iter()
        .take(KNOWLEDGE_SHOWN)
        .collect();
    if top.is_empty() {
        return;
    }

    out.push(String::new());
    out.push(format!("## Recent Knowledge ({total} entries)"));
    out.push(String::new());
    out.extend(top.iter().map(format_summary_line));
    out.push(String::new());
    out.push(format!("  Search: {} recall \"keyword\"", env!("CARGO_PKG_NAME")));
}
