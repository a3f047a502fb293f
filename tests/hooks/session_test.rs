//! SessionStart, UserPromptSubmit and PreCompact.

use beads_guard::hooks::HookEvent;
use beads_guard::probe::FakeRunner;
use serde_json::json;

use super::{handler, run};

#[tokio::test]
async fn test_session_start_without_beads() {
    let temp = tempfile::tempdir().unwrap();
    let (handler, _) = handler(temp.path(), FakeRunner::new());

    let printed = run(&handler, HookEvent::SessionStart, &json!({"source": "startup"})).await;
    assert_eq!(
        printed.as_deref(),
        Some("No .beads directory found. Run 'bd init' to initialize.\n")
    );
}

#[tokio::test]
async fn test_session_start_shows_recent_knowledge() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::create_dir(temp.path().join(".beads")).unwrap();
    let runner = FakeRunner::new().respond("bd --version", "bd 0.9.0");
    let (handler, _) = handler(temp.path(), runner);

    // Capture through the PostToolUse pipeline, then start a new session.
    let learned = json!({
        "tool_name": "Bash",
        "cwd": temp.path().to_string_lossy(),
        "tool_input": {"command": "bd comment bd-2 \"LEARNED: migrations must run before seeding\""}
    });
    assert_eq!(run(&handler, HookEvent::PostToolUse, &learned).await, None);

    let printed = run(&handler, HookEvent::SessionStart, &json!({})).await.unwrap();
    assert!(printed.contains("migrations must run before seeding"));
    assert!(printed.contains("recall"));
}

#[tokio::test]
async fn test_short_prompt_asks_for_clarification() {
    let temp = tempfile::tempdir().unwrap();
    let (handler, _) = handler(temp.path(), FakeRunner::new());

    let printed = run(&handler, HookEvent::UserPromptSubmit, &json!({"prompt": "fix it"}))
        .await
        .unwrap();
    assert!(printed.starts_with("<system-reminder>\nSTOP. This request is too short"));
    assert!(printed.contains("<cross-domain-check>"));

    let long = "a".repeat(250);
    let printed = run(&handler, HookEvent::UserPromptSubmit, &json!({"prompt": long}))
        .await
        .unwrap();
    assert!(printed.starts_with("<cross-domain-check>"));
}

#[tokio::test]
async fn test_pre_compact_nudges_empty_state() {
    let temp = tempfile::tempdir().unwrap();
    std::fs::write(
        temp.path().join("CLAUDE.md"),
        "# Project\n\n## Current State\n\n## Tech Stack\n\nRust\n",
    )
    .unwrap();
    let runner = FakeRunner::new().respond("git rev-parse --show-toplevel", temp.path().to_string_lossy());
    let (handler, _) = handler(temp.path(), runner);

    let printed = run(&handler, HookEvent::PreCompact, &json!({})).await.unwrap();
    assert!(printed.starts_with("CLAUDE.md MAINTENANCE REMINDER:"));
}

#[tokio::test]
async fn test_pre_compact_silent_outside_repo() {
    let temp = tempfile::tempdir().unwrap();
    let (handler, _) = handler(temp.path(), FakeRunner::new());
    assert_eq!(run(&handler, HookEvent::PreCompact, &json!({})).await, None);
}
