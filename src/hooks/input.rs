//! Hook input envelope sent by Claude Code on stdin.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input received from Claude Code hook events.
///
/// Every field is optional. A payload that does not parse at all becomes
/// the empty envelope, on which every rule is a no-op.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HookInput {
    /// The hook event name (`PreToolUse`, `SubagentStop`, ...).
    pub hook_event_name: String,

    pub session_id: String,

    /// Working directory of the session that triggered the hook.
    pub cwd: String,

    /// Main session transcript.
    pub transcript_path: String,

    /// Transcript of the subagent that is stopping (`SubagentStop`).
    pub agent_transcript_path: String,

    /// Id of the subagent that is stopping (`SubagentStop`).
    pub agent_id: String,

    pub permission_mode: String,

    pub tool_name: String,

    pub tool_use_id: String,

    /// Tool arguments (`PreToolUse`/`PostToolUse`).
    pub tool_input: Value,

    /// Tool result (`PostToolUse`).
    pub tool_result: Value,

    /// Structured tool result sent by newer clients in place of `tool_result`.
    pub tool_response: Value,

    /// User prompt (`UserPromptSubmit`).
    pub prompt: String,

    pub stop_hook_active: bool,
}

impl HookInput {
    /// Parse stdin leniently.
    #[must_use]
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(input) => input,
            Err(e) => {
                tracing::debug!(error = %e, "Unparsable hook input, using empty envelope");
                Self::default()
            }
        }
    }

    /// String at a dotted path such as `tool_input.file_path`.
    ///
    /// Missing keys and non-string values read as `""`.
    #[must_use]
    pub fn field(&self, path: &str) -> &str {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };

        let root = match head {
            "tool_input" => &self.tool_input,
            "tool_result" => &self.tool_result,
            "tool_response" => &self.tool_response,
            _ if rest.is_none() => return self.top_level(head),
            _ => return "",
        };

        rest.map_or(Some(root), |rest| {
            rest.split('.').try_fold(root, |cur, key| cur.get(key))
        })
        .and_then(Value::as_str)
        .unwrap_or("")
    }

    fn top_level(&self, name: &str) -> &str {
        match name {
            "hook_event_name" => &self.hook_event_name,
            "session_id" => &self.session_id,
            "cwd" => &self.cwd,
            "transcript_path" => &self.transcript_path,
            "agent_transcript_path" => &self.agent_transcript_path,
            "agent_id" => &self.agent_id,
            "permission_mode" => &self.permission_mode,
            "tool_name" => &self.tool_name,
            "tool_use_id" => &self.tool_use_id,
            "prompt" => &self.prompt,
            _ => "",
        }
    }

    /// Shorthand for `field("tool_input.<key>")`.
    #[must_use]
    pub fn tool_input_str(&self, key: &str) -> &str {
        self.tool_input.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Text of the tool result: a plain string, or the text blocks of a
    /// structured result joined by newlines.
    #[must_use]
    pub fn tool_result_text(&self) -> String {
        [&self.tool_result, &self.tool_response]
            .into_iter()
            .find_map(result_text)
            .unwrap_or_default()
    }
}

fn result_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Array(blocks) => {
            let texts: Vec<&str> = blocks
                .iter()
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect();
            (!texts.is_empty()).then(|| texts.join("\n"))
        }
        Value::Object(map) => map.get("content").and_then(result_text),
        _ => None,
    }
}
