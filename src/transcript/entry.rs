//! Loose view of Claude Code transcript lines.
//!
//! Only the fields the hooks read are modelled, all optional, so a line from
//! a newer client version still parses.

use serde::Deserialize;

/// One JSONL line of a session or subagent transcript.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TranscriptLine {
    #[serde(rename = "agentId")]
    pub agent_id: Option<String>,
    /// Task tool call that spawned the agent this line belongs to.
    #[serde(rename = "parentToolUseID")]
    pub parent_tool_use_id: Option<String>,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Message {
    pub role: String,
    pub content: MessageContent,
}

/// Message content: plain text or a list of blocks.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl Default for MessageContent {
    fn default() -> Self {
        Self::Blocks(Vec::new())
    }
}

/// A content block. `type` distinguishes `text`, `tool_use`, `tool_result`...
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub input: Option<serde_json::Value>,
}

impl TranscriptLine {
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        serde_json::from_str(line).ok()
    }

    /// First non-empty text block of an assistant message.
    #[must_use]
    pub fn assistant_text(&self) -> Option<&str> {
        let message = self.message.as_ref().filter(|m| m.role == "assistant")?;
        match &message.content {
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|b| b.text.as_deref())
                .find(|t| !t.is_empty()),
            MessageContent::Text(_) => None,
        }
    }

    /// The `tool_use` block with the given id.
    #[must_use]
    pub fn tool_use(&self, id: &str) -> Option<&ContentBlock> {
        match &self.message.as_ref()?.content {
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .find(|b| b.kind == "tool_use" && b.id.as_deref() == Some(id)),
            MessageContent::Text(_) => None,
        }
    }
}

impl ContentBlock {
    /// String field of the tool input, if present.
    #[must_use]
    pub fn input_str(&self, field: &str) -> Option<&str> {
        self.input.as_ref()?.get(field)?.as_str()
    }
}
