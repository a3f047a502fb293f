//! Claude Code settings.json types.
//!
//! This module provides types for reading and writing Claude Code's
//! settings.json file, specifically for managing hook configurations.
//! Hooks are grouped per event into matcher groups:
//!
//! ```json
//! {"hooks": {"PreToolUse": [{"matcher": "Bash", "hooks": [{"type": "command", "command": "..."}]}]}}
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::hooks::HookEvent;

/// Substring identifying commands installed by this tool.
const GUARD_COMMAND_MARKER: &str = "beads-guard";

/// Claude Code settings from ~/.claude/settings.json.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClaudeSettings {
    /// Hook configuration section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hooks: Option<HooksConfig>,
    /// Other fields we preserve but don't interpret.
    #[serde(flatten)]
    pub other: HashMap<String, serde_json::Value>,
}

/// Hook configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HooksConfig {
    #[serde(rename = "PreToolUse", skip_serializing_if = "Option::is_none")]
    pub pre_tool_use: Option<Vec<HookMatcher>>,
    #[serde(rename = "PostToolUse", skip_serializing_if = "Option::is_none")]
    pub post_tool_use: Option<Vec<HookMatcher>>,
    #[serde(rename = "SubagentStop", skip_serializing_if = "Option::is_none")]
    pub subagent_stop: Option<Vec<HookMatcher>>,
    #[serde(rename = "SessionStart", skip_serializing_if = "Option::is_none")]
    pub session_start: Option<Vec<HookMatcher>>,
    #[serde(rename = "UserPromptSubmit", skip_serializing_if = "Option::is_none")]
    pub user_prompt_submit: Option<Vec<HookMatcher>>,
    #[serde(rename = "PreCompact", skip_serializing_if = "Option::is_none")]
    pub pre_compact: Option<Vec<HookMatcher>>,
    /// Other hook types we preserve but don't interpret.
    #[serde(flatten)]
    pub other: HashMap<String, serde_json::Value>,
}

impl HooksConfig {
    /// Matcher groups registered for an event.
    pub fn event_mut(&mut self, event: HookEvent) -> &mut Option<Vec<HookMatcher>> {
        match event {
            HookEvent::PreToolUse => &mut self.pre_tool_use,
            HookEvent::PostToolUse => &mut self.post_tool_use,
            HookEvent::SubagentStop => &mut self.subagent_stop,
            HookEvent::SessionStart => &mut self.session_start,
            HookEvent::UserPromptSubmit => &mut self.user_prompt_submit,
            HookEvent::PreCompact => &mut self.pre_compact,
        }
    }

    #[must_use]
    pub fn event(&self, event: HookEvent) -> Option<&[HookMatcher]> {
        match event {
            HookEvent::PreToolUse => self.pre_tool_use.as_deref(),
            HookEvent::PostToolUse => self.post_tool_use.as_deref(),
            HookEvent::SubagentStop => self.subagent_stop.as_deref(),
            HookEvent::SessionStart => self.session_start.as_deref(),
            HookEvent::UserPromptSubmit => self.user_prompt_submit.as_deref(),
            HookEvent::PreCompact => self.pre_compact.as_deref(),
        }
    }

    /// Whether no event section remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        HookEvent::ALL.iter().all(|e| self.event(*e).is_none()) && self.other.is_empty()
    }
}

/// Hooks that run for tool names matching `matcher` (all when absent).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HookMatcher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,
    #[serde(default)]
    pub hooks: Vec<HookEntry>,
}

impl HookMatcher {
    #[must_use]
    pub fn new(matcher: Option<&str>, hooks: Vec<HookEntry>) -> Self {
        Self {
            matcher: matcher.map(String::from),
            hooks,
        }
    }

    /// Whether any hook in the group was installed by beads-guard.
    #[must_use]
    pub fn is_guard_group(&self) -> bool {
        self.hooks.iter().any(HookEntry::is_guard_hook)
    }
}

/// A single hook entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HookEntry {
    /// Hook type (always "command" for our hooks).
    #[serde(rename = "type")]
    pub hook_type: String,
    /// Command to execute.
    pub command: String,
    /// Timeout in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

impl HookEntry {
    /// Creates a new command hook entry.
    #[must_use]
    pub fn command(cmd: impl Into<String>, timeout: u32) -> Self {
        Self {
            hook_type: "command".to_string(),
            command: cmd.into(),
            timeout: Some(timeout),
        }
    }

    /// Checks if this hook entry was created by beads-guard.
    #[must_use]
    pub fn is_guard_hook(&self) -> bool {
        self.command.contains(GUARD_COMMAND_MARKER)
    }
}

impl ClaudeSettings {
    /// Returns the default path for Claude settings.json.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".claude").join("settings.json"))
    }

    /// Project-scoped settings file.
    #[must_use]
    pub fn project_path(project_dir: &Path) -> PathBuf {
        project_dir.join(".claude").join("settings.json")
    }

    /// Loads settings from the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| SettingsError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Saves settings to the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        let content = serde_json::to_string_pretty(self).map_err(SettingsError::SerializeError)?;
        std::fs::write(path, content).map_err(|e| SettingsError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Errors that can occur when working with Claude settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Failed to read settings file.
    #[error("Failed to read settings from {path}: {source}")]
    ReadError {
        /// Path to the settings file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse settings file.
    #[error("Failed to parse settings from {path}: {source}")]
    ParseError {
        /// Path to the settings file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// Failed to write settings file.
    #[error("Failed to write settings to {path}: {source}")]
    WriteError {
        /// Path to the settings file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to serialize settings.
    #[error("Failed to serialize settings: {0}")]
    SerializeError(serde_json::Error),
}
