//! Hook pipeline tests, one file per event group.

mod post_tool_use_test;
mod pre_tool_use_test;
mod session_test;
mod subagent_stop_test;

use std::path::Path;
use std::sync::Arc;

use beads_guard::config::GuardConfig;
use beads_guard::hooks::{HookContext, HookEvent, HookHandler};
use beads_guard::probe::FakeRunner;

/// Handler rooted at `dir` whose external commands are scripted by `runner`.
pub fn handler(dir: &Path, runner: FakeRunner) -> (HookHandler, Arc<FakeRunner>) {
    let runner = Arc::new(runner);
    let ctx = HookContext::new(dir, dir, GuardConfig::default(), runner.clone());
    (HookHandler::new(ctx), runner)
}

/// Run one event and return what the binary would print.
pub async fn run(handler: &HookHandler, event: HookEvent, payload: &serde_json::Value) -> Option<String> {
    handler
        .handle_json(event, &payload.to_string())
        .await
        .render()
        .unwrap()
}

/// Parse printed JSON.
pub fn json(printed: Option<String>) -> serde_json::Value {
    serde_json::from_str(&printed.expect("hook printed nothing")).unwrap()
}

/// Verify the public hook surface is exported from the library.
#[test]
fn test_hook_types_exported() {
    use beads_guard::hooks::rules::{
        CloseGate, CompactNudge, CompletionCheck, ConciseResponse, DispatchGate, DispatchLog,
        KnowledgeCapture, PromptClarity, SessionSummary, ToolGate,
    };
    use beads_guard::hooks::{rules::rules_for, Rule};

    let names: Vec<&str> = rules_for(HookEvent::PreToolUse).iter().map(|r| r.name()).collect();
    assert_eq!(names, ["dispatch-gate", "close-gate", "tool-gate"]);
    let names: Vec<&str> = rules_for(HookEvent::PostToolUse).iter().map(|r| r.name()).collect();
    assert_eq!(names, ["memory-capture", "dispatch-log", "concise-response"]);

    let _: [&dyn Rule; 10] = [
        &DispatchGate,
        &CloseGate,
        &ToolGate,
        &KnowledgeCapture,
        &DispatchLog,
        &ConciseResponse,
        &CompletionCheck,
        &SessionSummary,
        &PromptClarity,
        &CompactNudge,
    ];
}
