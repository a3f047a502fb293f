//! PreToolUse: dispatch, close and tool gates end to end.

use beads_guard::hooks::HookEvent;
use beads_guard::probe::FakeRunner;
use serde_json::json;

use super::{handler, json, run};

fn decision(printed: Option<String>) -> (String, String) {
    let value = json(printed);
    let output = &value["hookSpecificOutput"];
    assert_eq!(output["hookEventName"], "PreToolUse");
    (
        output["permissionDecision"].as_str().unwrap().to_string(),
        output["permissionDecisionReason"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_dispatch_to_closed_bead_denied() {
    let temp = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new().respond("bd show bd-5 --json", r#"[{"id":"bd-5","status":"closed"}]"#);
    let (handler, _) = handler(temp.path(), runner);

    let payload = json!({
        "tool_name": "Task",
        "tool_input": {"subagent_type": "rust-supervisor", "prompt": "BEAD_ID: bd-5\nFix it"}
    });
    let (kind, reason) = decision(run(&handler, HookEvent::PreToolUse, &payload).await);
    assert_eq!(kind, "deny");
    assert!(reason.contains("bd-5"));
}

#[tokio::test]
async fn test_epic_child_waits_for_blockers() {
    let temp = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new()
        .respond("bd show bd-9.2 --json", r#"[{"id":"bd-9.2","status":"open"}]"#)
        .respond(
            "bd dep list bd-9.2 --json",
            r#"[{"id":"bd-9","status":"open"},{"id":"bd-9.1","status":"in_progress"}]"#,
        );
    let (handler, _) = handler(temp.path(), runner);

    let payload = json!({
        "tool_name": "Task",
        "tool_input": {"subagent_type": "rust-supervisor", "prompt": "BEAD_ID: bd-9.2"}
    });
    let (kind, reason) = decision(run(&handler, HookEvent::PreToolUse, &payload).await);
    assert_eq!(kind, "deny");
    assert!(reason.contains("bd-9.1"));
    assert!(!reason.contains("bd-9,"));
}

#[tokio::test]
async fn test_accepted_dispatch_prints_reminders() {
    let temp = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new().respond("bd show bd-3 --json", r#"[{"id":"bd-3","status":"open"}]"#);
    let (handler, _) = handler(temp.path(), runner);

    let payload = json!({
        "tool_name": "Task",
        "tool_input": {"subagent_type": "rust-supervisor", "prompt": "BEAD_ID: bd-3"}
    });
    let printed = run(&handler, HookEvent::PreToolUse, &payload).await.unwrap();
    assert!(printed.starts_with("IMPORTANT: Before dispatching"));
    assert!(printed.contains("bd update {BEAD_ID} --status in_progress"));
}

#[tokio::test]
async fn test_close_without_merged_pr_denied() {
    let temp = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new()
        .respond("git remote get-url origin", "git@github.com:o/r.git")
        .respond("git ls-remote --heads origin bd-bd-4", "abc\trefs/heads/bd-bd-4")
        .respond("gh pr list --head bd-bd-4 --state merged --json number --jq .[0].number", "");
    let (handler, _) = handler(temp.path(), runner);

    let payload = json!({"tool_name": "Bash", "tool_input": {"command": "bd close bd-4"}});
    let (kind, reason) = decision(run(&handler, HookEvent::PreToolUse, &payload).await);
    assert_eq!(kind, "deny");
    assert!(reason.starts_with("Cannot close bead 'bd-4' - branch 'bd-bd-4' has no merged PR."));

    let forced = json!({"tool_name": "Bash", "tool_input": {"command": "bd close bd-4 --force"}});
    assert_eq!(run(&handler, HookEvent::PreToolUse, &forced).await, None);
}

#[tokio::test]
async fn test_close_fails_open_without_tooling() {
    let temp = tempfile::tempdir().unwrap();
    let (handler, runner) = handler(temp.path(), FakeRunner::new());

    let payload = json!({"tool_name": "Bash", "tool_input": {"command": "bd close bd-4"}});
    assert_eq!(run(&handler, HookEvent::PreToolUse, &payload).await, None);
    assert!(runner.was_called("git remote get-url"));
}

#[tokio::test]
async fn test_orchestrator_edit_on_main_denied() {
    let temp = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new().respond("git branch --show-current", "main");
    let (handler, _) = handler(temp.path(), runner);

    let payload = json!({"tool_name": "Edit", "tool_input": {"file_path": "/repo/src/lib.rs"}});
    let (kind, reason) = decision(run(&handler, HookEvent::PreToolUse, &payload).await);
    assert_eq!(kind, "deny");
    assert!(reason.starts_with("Cannot edit files on main branch."));

    let claude_md = json!({"tool_name": "Edit", "tool_input": {"file_path": "/repo/CLAUDE.md"}});
    assert_eq!(run(&handler, HookEvent::PreToolUse, &claude_md).await, None);
}

#[tokio::test]
async fn test_orchestrator_quick_fix_asks() {
    let temp = tempfile::tempdir().unwrap();
    let runner = FakeRunner::new().respond("git branch --show-current", "quick-fix");
    let (handler, _) = handler(temp.path(), runner);

    let payload = json!({
        "tool_name": "Write",
        "tool_input": {"file_path": "/repo/src/new.rs", "content": "fn main() {}\n"}
    });
    let (kind, reason) = decision(run(&handler, HookEvent::PreToolUse, &payload).await);
    assert_eq!(kind, "ask");
    assert!(reason.contains("new file"));
}

#[tokio::test]
async fn test_subagent_edit_on_feature_branch_allowed() {
    let temp = tempfile::tempdir().unwrap();
    let transcript = temp.path().join("session.jsonl");
    let subagents = temp.path().join("session").join("subagents");
    std::fs::create_dir_all(&subagents).unwrap();
    std::fs::write(
        subagents.join("agent-a1.jsonl"),
        r#"{"type":"assistant","message":{"content":[{"type":"tool_use","id":"toolu_7","name":"Edit"}]}}"#,
    )
    .unwrap();

    let runner = FakeRunner::new().respond("git branch --show-current", "bd-bd-7");
    let (handler, _) = handler(temp.path(), runner);

    let payload = json!({
        "tool_name": "Edit",
        "tool_use_id": "toolu_7",
        "transcript_path": transcript.to_string_lossy(),
        "tool_input": {"file_path": "/repo/src/lib.rs"}
    });
    assert_eq!(run(&handler, HookEvent::PreToolUse, &payload).await, None);
}

#[tokio::test]
async fn test_git_no_verify_denied() {
    let temp = tempfile::tempdir().unwrap();
    let (handler, _) = handler(temp.path(), FakeRunner::new());

    let payload = json!({"tool_name": "Bash", "tool_input": {"command": "git commit --no-verify -m wip"}});
    let (kind, reason) = decision(run(&handler, HookEvent::PreToolUse, &payload).await);
    assert_eq!(kind, "deny");
    assert!(reason.starts_with("git commit --no-verify is blocked."));

    let payload = json!({"tool_name": "Bash", "tool_input": {"command": "bd create \"Fix login\""}});
    let (kind, _) = decision(run(&handler, HookEvent::PreToolUse, &payload).await);
    assert_eq!(kind, "deny");

    let payload = json!({"tool_name": "Bash", "tool_input": {"command": "bd create \"Fix login\" -d \"details\""}});
    assert_eq!(run(&handler, HookEvent::PreToolUse, &payload).await, None);
}
