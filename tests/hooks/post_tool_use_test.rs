//! PostToolUse: knowledge capture, dispatch logging and report size.

use beads_guard::config::KnowledgeConfig;
use beads_guard::hooks::HookEvent;
use beads_guard::knowledge::{EntrySource, KnowledgeStore};
use beads_guard::probe::FakeRunner;
use serde_json::json;

use super::{handler, json, run};

#[tokio::test]
async fn test_learned_comment_is_captured() {
    let temp = tempfile::tempdir().unwrap();
    let (handler, _) = handler(temp.path(), FakeRunner::new());

    let worktree = temp.path().join(".worktrees").join("bd-bd-12");
    let payload = json!({
        "tool_name": "Bash",
        "cwd": worktree.to_string_lossy(),
        "tool_input": {"command": "bd comment bd-12 \"LEARNED: sqlite needs WAL mode for concurrent readers\""}
    });
    assert_eq!(run(&handler, HookEvent::PostToolUse, &payload).await, None);

    let store = KnowledgeStore::for_project(temp.path(), &KnowledgeConfig::default());
    let entries = store.read_active();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].bead, "bd-12");
    assert_eq!(entries[0].content, "sqlite needs WAL mode for concurrent readers");
    assert_eq!(entries[0].source, EntrySource::Supervisor);
    assert!(entries[0].key.starts_with("learned-sqlite-needs-wal-mode"));
}

#[tokio::test]
async fn test_plain_commands_not_captured() {
    let temp = tempfile::tempdir().unwrap();
    let (handler, _) = handler(temp.path(), FakeRunner::new());

    let payload = json!({"tool_name": "Bash", "tool_input": {"command": "cargo test"}});
    assert_eq!(run(&handler, HookEvent::PostToolUse, &payload).await, None);
    assert!(!temp.path().join(".beads").exists());
}

#[tokio::test]
async fn test_supervisor_dispatch_logged_to_bead() {
    let temp = tempfile::tempdir().unwrap();
    let (handler, runner) = handler(temp.path(), FakeRunner::new());

    let payload = json!({
        "tool_name": "Task",
        "tool_input": {"subagent_type": "rust-supervisor", "prompt": "BEAD_ID: bd-3\nAdd retries"},
        "tool_result": "BEAD bd-3 COMPLETE"
    });
    assert_eq!(run(&handler, HookEvent::PostToolUse, &payload).await, None);

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("bd comment bd-3 DISPATCH_PROMPT [rust-supervisor]:"));
    assert!(calls[0].ends_with("BEAD_ID: bd-3\nAdd retries"));
}

#[tokio::test]
async fn test_verbose_result_warns() {
    let temp = tempfile::tempdir().unwrap();
    let (handler, runner) = handler(temp.path(), FakeRunner::new());

    let payload = json!({
        "tool_name": "Task",
        "tool_input": {"subagent_type": "scout", "prompt": "look around"},
        "tool_response": {"content": [{"type": "text", "text": "x".repeat(600)}]}
    });
    let value = json(run(&handler, HookEvent::PostToolUse, &payload).await);
    let warning = value["hookSpecificOutput"]["warning"].as_str().unwrap();
    assert!(warning.starts_with("Subagent response exceeded limits (1 lines, 600 chars)."));
    assert!(runner.calls().is_empty(), "non-supervisor dispatches are not logged");
}
