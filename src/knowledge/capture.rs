//! Knowledge capture from `bd comment <id> "LEARNED: ..."` commands.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::KnowledgeConfig;

use super::entry::{truncate_chars, EntrySource, EntryType, KnowledgeEntry};
use super::error::KnowledgeError;
use super::store::{KnowledgeStore, Rotation};

/// Literal that introduces the captured content inside a comment body.
pub const LEARNED_MARKER: &str = "LEARNED:";

/// Maximum characters of comment body considered.
const MAX_BODY_CHARS: usize = 4096;

static COMMENT_VERB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bd\s+comment\s+").expect("valid regex"));
static COMMENT_BEAD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"bd\s+comment\s+([A-Za-z0-9._-]+)\s+").expect("valid regex"));
static COMMENT_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)bd\s+comment\s+[A-Za-z0-9._-]+\s+["'](.*)["']\s*$"#).expect("valid regex")
});
static LEARNED_CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)LEARNED:\s*(.*)").expect("valid regex"));

/// A `LEARNED:` annotation recovered from a shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnedComment {
    /// Bead the comment was posted to.
    pub bead: String,
    /// Trimmed content after the marker, already truncated.
    pub content: String,
}

impl LearnedComment {
    /// Recover the annotation from a command string.
    ///
    /// Returns `None` unless the command is a `bd comment <id> "<body>"` whose
    /// body carries non-empty text after `LEARNED:`.
    #[must_use]
    pub fn parse(command: &str, max_content_chars: usize) -> Option<Self> {
        if !COMMENT_VERB.is_match(command) || !command.contains(LEARNED_MARKER) {
            return None;
        }

        let bead = COMMENT_BEAD.captures(command)?.get(1)?.as_str().to_string();

        let body = COMMENT_BODY.captures(command)?.get(1)?.as_str();
        let body = truncate_chars(body, MAX_BODY_CHARS);
        if body.is_empty() {
            return None;
        }

        let raw = LEARNED_CONTENT.captures(body)?.get(1)?.as_str();
        let content = truncate_chars(raw.trim(), max_content_chars);
        if content.is_empty() {
            return None;
        }

        Some(Self {
            bead,
            content: content.to_string(),
        })
    }

    /// Turn the annotation into a log entry.
    #[must_use]
    pub fn into_entry(self, source: EntrySource, ts: i64) -> KnowledgeEntry {
        KnowledgeEntry::new(EntryType::Learned, self.content, source, self.bead, ts)
    }
}

/// Everything capture needs besides the command itself.
#[derive(Debug, Clone)]
pub struct CaptureContext<'a> {
    /// Working directory of the session that ran the command.
    pub cwd: &'a str,
    /// Worktree directory name used for source classification.
    pub worktree_dir: &'a str,
    /// Capture timestamp (Unix seconds).
    pub ts: i64,
}

/// Result of a successful capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Captured {
    pub entry: KnowledgeEntry,
    /// `None` when the rotation check itself failed.
    pub rotation: Option<Rotation>,
}

/// Extract a `LEARNED:` entry from `command` and append it to the store.
///
/// Returns `Ok(None)` when the command carries no annotation. A failed
/// rotation is logged and does not fail the capture, since the append is
/// already durable.
///
/// # Errors
///
/// Returns an error only if the append itself fails.
pub fn capture(
    store: &KnowledgeStore,
    config: &KnowledgeConfig,
    command: &str,
    ctx: &CaptureContext<'_>,
) -> Result<Option<Captured>, KnowledgeError> {
    let Some(comment) = LearnedComment::parse(command, config.max_content_chars) else {
        tracing::trace!("Command carries no LEARNED annotation");
        return Ok(None);
    };

    let source = EntrySource::from_cwd(ctx.cwd, ctx.worktree_dir);
    let entry = comment.into_entry(source, ctx.ts);
    store.append(&entry)?;
    tracing::info!(key = %entry.key, bead = %entry.bead, source = %entry.source, "Captured knowledge");

    let rotation = match store.rotate_if_needed() {
        Ok(rotation) => Some(rotation),
        Err(e) => {
            tracing::warn!(error = %e, "Knowledge rotation failed");
            None
        }
    };

    Ok(Some(Captured { entry, rotation }))
}
