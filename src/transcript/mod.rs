//! Transcript scanning for hook decisions.
//!
//! Lines are selected by substring match on their raw JSON first
//! (`"agentId":"<id>"`, `"id":"<tool_use_id>"`, `"name":"Task"`) and only
//! the matching lines are parsed. Read errors are treated as "not found".

mod entry;

pub use entry::*;

use std::path::{Path, PathBuf};

/// Lines from the end of an agent transcript searched for its final answer.
pub const LAST_RESPONSE_WINDOW: usize = 200;

/// Text of the last assistant message within the final `window` lines.
/// Empty when the file is missing or holds no assistant text.
pub async fn last_assistant_text(path: &Path, window: usize) -> String {
    let Ok(content) = tokio::fs::read_to_string(path).await else {
        return String::new();
    };
    let lines: Vec<&str> = content.lines().filter(|l| !l.is_empty()).collect();
    let start = lines.len().saturating_sub(window);

    lines[start..]
        .iter()
        .rev()
        .filter_map(|line| TranscriptLine::parse(line))
        .find_map(|line| line.assistant_text().map(str::to_string))
        .unwrap_or_default()
}

/// `subagent_type` of the Task call that spawned `agent_id`, recovered from
/// the main session transcript. Empty when it cannot be determined.
pub async fn subagent_type(main_transcript: &Path, agent_id: &str) -> String {
    if agent_id.is_empty() {
        return String::new();
    }
    let Ok(content) = tokio::fs::read_to_string(main_transcript).await else {
        return String::new();
    };
    let lines: Vec<&str> = content.lines().filter(|l| !l.is_empty()).collect();

    let agent_marker = format!(r#""agentId":"{agent_id}""#);
    let Some(parent) = lines
        .iter()
        .find(|l| l.contains(&agent_marker))
        .and_then(|l| TranscriptLine::parse(l))
        .and_then(|l| l.parent_tool_use_id)
        .filter(|id| !id.is_empty())
    else {
        return String::new();
    };

    let id_marker = format!(r#""id":"{parent}""#);
    lines
        .iter()
        .find(|l| l.contains(&id_marker) && l.contains(r#""name":"Task""#))
        .and_then(|l| TranscriptLine::parse(l))
        .and_then(|l| {
            l.tool_use(&parent)
                .and_then(|b| b.input_str("subagent_type"))
                .map(str::to_string)
        })
        .unwrap_or_default()
}

/// Directory holding subagent transcripts for a session transcript:
/// `<transcript without .jsonl>/subagents`.
#[must_use]
pub fn subagents_dir(transcript_path: &Path) -> PathBuf {
    let raw = transcript_path.to_string_lossy();
    let session = raw.strip_suffix(".jsonl").unwrap_or(&raw);
    PathBuf::from(session).join("subagents")
}

/// Whether `tool_use_id` was issued from inside a subagent of this session.
pub async fn is_subagent_call(transcript_path: &Path, tool_use_id: &str) -> bool {
    let dir = subagents_dir(transcript_path);
    let Ok(mut entries) = tokio::fs::read_dir(&dir).await else {
        return false;
    };
    let marker = format!(r#""id":"{tool_use_id}""#);

    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !(name.starts_with("agent-") && name.ends_with(".jsonl")) {
            continue;
        }
        match tokio::fs::read_to_string(entry.path()).await {
            Ok(content) if content.contains(&marker) => return true,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(path = %entry.path().display(), error = %e, "Skipping unreadable subagent transcript");
            }
        }
    }
    false
}

/// Whether the file contains `needle` anywhere.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be read.
pub async fn contains(path: &Path, needle: &str) -> std::io::Result<bool> {
    Ok(tokio::fs::read_to_string(path).await?.contains(needle))
}
