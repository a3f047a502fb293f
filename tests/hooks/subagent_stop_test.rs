//! SubagentStop: supervisor completion verification.

use std::path::{Path, PathBuf};

use beads_guard::hooks::HookEvent;
use beads_guard::probe::FakeRunner;
use serde_json::json;

use super::{handler, json, run};

const REPORT: &str = "BEAD bd-4 COMPLETE\nWorktree: .worktrees/bd-bd-4\nTests: pass\nSummary: added retries";

/// Write a main transcript spawning `a1` as `subagent_type`, and an agent
/// transcript that optionally commented on the bead before answering.
fn transcripts(root: &Path, subagent_type: &str, response: &str, commented: bool) -> (PathBuf, PathBuf) {
    let main = root.join("main.jsonl");
    let agent = root.join("agent-a1.jsonl");

    let spawn = json!({"type": "assistant", "message": {"role": "assistant", "content": [
        {"type": "tool_use", "id": "toolu_1", "name": "Task", "input": {"subagent_type": subagent_type}}
    ]}});
    let progress = json!({"type": "progress", "agentId": "a1", "parentToolUseID": "toolu_1"});
    std::fs::write(&main, format!("{spawn}\n{progress}\n")).unwrap();

    let mut lines = Vec::new();
    if commented {
        lines.push(json!({"type": "assistant", "message": {"role": "assistant", "content": [
            {"type": "tool_use", "id": "toolu_2", "name": "Bash", "input": {"command": "bd comment bd-4 \"done\""}}
        ]}}).to_string());
    }
    lines.push(
        json!({"type": "assistant", "message": {"role": "assistant", "content": [
            {"type": "text", "text": response}
        ]}})
        .to_string(),
    );
    std::fs::write(&agent, lines.join("\n")).unwrap();
    (main, agent)
}

fn payload(main: &Path, agent: &Path) -> serde_json::Value {
    json!({
        "hook_event_name": "SubagentStop",
        "transcript_path": main.to_string_lossy(),
        "agent_transcript_path": agent.to_string_lossy(),
        "agent_id": "a1"
    })
}

fn verified(root: &Path, status: &str) -> FakeRunner {
    std::fs::create_dir_all(root.join(".worktrees").join("bd-bd-4")).unwrap();
    FakeRunner::new()
        .respond("git rev-parse --show-toplevel", root.to_string_lossy())
        .respond("git status --porcelain", "")
        .respond("git remote get-url origin", "git@github.com:o/r.git")
        .respond("git ls-remote --heads origin bd-bd-4", "abc\trefs/heads/bd-bd-4")
        .respond("bd show bd-4 --json", format!(r#"[{{"id":"bd-4","status":"{status}"}}]"#))
}

fn reason(value: &serde_json::Value) -> &str {
    assert_eq!(value["decision"], "block");
    value["reason"].as_str().unwrap()
}

#[tokio::test]
async fn test_verified_supervisor_approved() {
    let temp = tempfile::tempdir().unwrap();
    let (main, agent) = transcripts(temp.path(), "rust-supervisor", REPORT, true);
    let (handler, _) = handler(temp.path(), verified(temp.path(), "inreview"));

    let printed = run(&handler, HookEvent::SubagentStop, &payload(&main, &agent)).await;
    assert_eq!(printed.as_deref(), Some(r#"{"decision":"approve"}"#));
}

#[tokio::test]
async fn test_missing_comment_blocks() {
    let temp = tempfile::tempdir().unwrap();
    let (main, agent) = transcripts(temp.path(), "rust-supervisor", REPORT, false);
    let (handler, _) = handler(temp.path(), verified(temp.path(), "inreview"));

    let value = json(run(&handler, HookEvent::SubagentStop, &payload(&main, &agent)).await);
    assert!(reason(&value).contains("bd comment"));
}

#[tokio::test]
async fn test_wrong_status_blocks() {
    let temp = tempfile::tempdir().unwrap();
    let (main, agent) = transcripts(temp.path(), "rust-supervisor", REPORT, true);
    let (handler, _) = handler(temp.path(), verified(temp.path(), "in_progress"));

    let value = json(run(&handler, HookEvent::SubagentStop, &payload(&main, &agent)).await);
    assert!(reason(&value).contains("in_progress"));
}

#[tokio::test]
async fn test_unpushed_branch_blocks() {
    let temp = tempfile::tempdir().unwrap();
    let (main, agent) = transcripts(temp.path(), "rust-supervisor", REPORT, true);
    let runner = verified(temp.path(), "inreview").respond("git ls-remote --heads origin bd-bd-4", "");
    let (handler, _) = handler(temp.path(), runner);

    let value = json(run(&handler, HookEvent::SubagentStop, &payload(&main, &agent)).await);
    assert!(reason(&value).starts_with("Work verification failed: branch not pushed."));
}

#[tokio::test]
async fn test_supervisor_without_report_blocks() {
    let temp = tempfile::tempdir().unwrap();
    let (main, agent) = transcripts(temp.path(), "rust-supervisor", "All done!", true);
    let (handler, _) = handler(temp.path(), FakeRunner::new());

    let value = json(run(&handler, HookEvent::SubagentStop, &payload(&main, &agent)).await);
    assert!(reason(&value).contains("completion report missing"));
}

#[tokio::test]
async fn test_non_supervisor_and_missing_transcript_approved() {
    let temp = tempfile::tempdir().unwrap();
    let (main, agent) = transcripts(temp.path(), "scout", "Found three call sites.", false);
    let (handler, _) = handler(temp.path(), FakeRunner::new());

    let printed = run(&handler, HookEvent::SubagentStop, &payload(&main, &agent)).await;
    assert_eq!(printed.as_deref(), Some(r#"{"decision":"approve"}"#));

    let gone = temp.path().join("gone.jsonl");
    let printed = run(&handler, HookEvent::SubagentStop, &payload(&main, &gone)).await;
    assert_eq!(printed.as_deref(), Some(r#"{"decision":"approve"}"#));
}
