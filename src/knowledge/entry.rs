//! Knowledge entry model and the derivations applied at capture time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Keywords promoted to tags when they occur anywhere in an entry's content.
///
/// Matching is a case-insensitive substring test, so `ui` also tags content
/// mentioning "build" or "required". Existing entries were tagged this way.
pub const TAG_VOCABULARY: &[&str] = &[
    "swift",
    "swiftui",
    "appkit",
    "menubar",
    "api",
    "security",
    "test",
    "database",
    "networking",
    "ui",
    "layout",
    "performance",
    "crash",
    "bug",
    "fix",
    "workaround",
    "gotcha",
    "pattern",
    "convention",
    "architecture",
    "auth",
    "middleware",
    "async",
    "concurrency",
    "model",
    "protocol",
    "adapter",
    "scanner",
    "engine",
];

/// Number of content characters that feed the key slug.
pub const KEY_SLUG_CHARS: usize = 60;

/// Kind of knowledge captured.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryType {
    /// A lesson recorded with a `LEARNED:` comment.
    Learned,
    /// Investigation notes; counted by stats but not produced by capture.
    Investigation,
    /// A type written by some other tool. Kept verbatim.
    Other(String),
}

impl EntryType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Learned => "learned",
            Self::Investigation => "investigation",
            Self::Other(s) => s,
        }
    }

    /// Upper-cased five character label used in listings (`LEARN`, `INVES`).
    #[must_use]
    pub fn label(&self) -> String {
        truncate_chars(self.as_str(), 5).to_uppercase()
    }
}

impl From<String> for EntryType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "learned" => Self::Learned,
            "investigation" => Self::Investigation,
            _ => Self::Other(value),
        }
    }
}

impl From<EntryType> for String {
    fn from(value: EntryType) -> Self {
        value.as_str().to_string()
    }
}

impl Default for EntryType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the workflow captured an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntrySource {
    /// Captured from inside an isolated worktree.
    Supervisor,
    /// Captured from the main checkout.
    Orchestrator,
    /// Written by some other tool, or missing. Kept verbatim.
    Other(String),
}

impl EntrySource {
    /// Classify a capturing working directory.
    ///
    /// Anything below a `.worktrees/` directory belongs to a supervisor.
    #[must_use]
    pub fn from_cwd(cwd: &str, worktree_dir: &str) -> Self {
        let normalized = cwd.replace('\\', "/");
        if normalized.contains(&format!("{worktree_dir}/")) {
            Self::Supervisor
        } else {
            Self::Orchestrator
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Supervisor => "supervisor",
            Self::Orchestrator => "orchestrator",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for EntrySource {
    fn from(value: String) -> Self {
        match value.as_str() {
            "supervisor" => Self::Supervisor,
            "orchestrator" => Self::Orchestrator,
            _ => Self::Other(value),
        }
    }
}

impl From<EntrySource> for String {
    fn from(value: EntrySource) -> Self {
        value.as_str().to_string()
    }
}

impl Default for EntrySource {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the knowledge log.
///
/// Field order matches the on-disk layout. Unknown fields written by other
/// tools are carried in `extra` so a read-then-serialize keeps them.
///
/// Reading never rejects a JSON object: fields of an unexpected shape fall
/// back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub key: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    pub kind: EntryType,
    #[serde(default, deserialize_with = "lenient::text")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub source: EntrySource,
    #[serde(default, deserialize_with = "lenient::tags")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient::ts")]
    pub ts: i64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub bead: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl KnowledgeEntry {
    /// Build an entry, deriving its key and tags from the content.
    #[must_use]
    pub fn new(
        kind: EntryType,
        content: impl Into<String>,
        source: EntrySource,
        bead: impl Into<String>,
        ts: i64,
    ) -> Self {
        let content = content.into();
        Self {
            key: entry_key(&kind, &content),
            tags: derive_tags(&kind, &content),
            kind,
            content,
            source,
            ts,
            bead: bead.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Serialize as a single log line (no trailing newline).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Field readers that accept whatever JSON another writer put in a line.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn as_text(value: Value) -> String {
        match value {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    /// Strings as-is, `null` as empty, anything else as its JSON text.
    pub fn text<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: From<String>,
    {
        Ok(T::from(as_text(Value::deserialize(deserializer)?)))
    }

    /// Any JSON number, truncated toward zero; everything else is 0.
    #[allow(clippy::cast_possible_truncation)]
    pub fn ts<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            _ => 0,
        })
    }

    /// An array of tags, or a comma separated string of them.
    pub fn tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items.into_iter().map(as_text).collect(),
            Value::String(s) => s
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        })
    }
}

/// Lowercase, collapse every run of characters outside `[a-z0-9]` into one
/// `-`, and trim dashes from both ends.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// `<type>-<slug of the first 60 content characters>`.
#[must_use]
pub fn entry_key(kind: &EntryType, content: &str) -> String {
    let head = truncate_chars(content, KEY_SLUG_CHARS);
    format!("{}-{}", kind.as_str(), slugify(head))
}

/// The type tag followed by every vocabulary keyword found in the content.
#[must_use]
pub fn derive_tags(kind: &EntryType, content: &str) -> Vec<String> {
    let lowered = content.to_lowercase();
    std::iter::once(kind.as_str().to_string())
        .chain(
            TAG_VOCABULARY
                .iter()
                .filter(|tag| lowered.contains(*tag))
                .map(|tag| (*tag).to_string()),
        )
        .collect()
}

/// Truncate to at most `max_chars` characters without splitting a code point.
#[must_use]
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_collapses_runs() {
        assert_eq!(slugify("Retries need  exponential -- backoff!"), "retries-need-exponential-backoff");
        assert_eq!(slugify("--Leading and trailing--"), "leading-and-trailing");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_drops_non_ascii_letters() {
        assert_eq!(slugify("café au lait"), "caf-au-lait");
    }

    #[test]
    fn test_entry_key_uses_first_sixty_chars() {
        let content = "a".repeat(59) + " bcdef";
        let key = entry_key(&EntryType::Learned, &content);
        assert_eq!(key, format!("learned-{}", "a".repeat(59)));
    }

    #[test]
    fn test_derive_tags_substring_semantics() {
        let tags = derive_tags(&EntryType::Learned, "Build the API quickly");
        // "ui" matches inside "build"
        assert_eq!(tags, vec!["learned", "api", "ui"]);
    }

    #[test]
    fn test_derive_tags_vocabulary_order() {
        let tags = derive_tags(&EntryType::Learned, "Engine crash in SwiftUI");
        assert_eq!(tags, vec!["learned", "swift", "swiftui", "ui", "crash", "engine"]);
    }

    #[test]
    fn test_source_from_cwd() {
        assert_eq!(
            EntrySource::from_cwd("/repo/.worktrees", ".worktrees"),
            EntrySource::Orchestrator
        );
        assert_eq!(
            EntrySource::from_cwd("/repo/.worktrees/bd-1/src", ".worktrees"),
            EntrySource::Supervisor
        );
        assert_eq!(
            EntrySource::from_cwd("C:\\repo\\.worktrees\\bd-2\\src", ".worktrees"),
            EntrySource::Supervisor
        );
        assert_eq!(EntrySource::from_cwd("/repo", ".worktrees"), EntrySource::Orchestrator);
    }

    #[test]
    fn test_entry_line_field_order() {
        let entry = KnowledgeEntry::new(EntryType::Learned, "use tokio", EntrySource::Orchestrator, "bd-1", 7);
        let line = entry.to_line().unwrap();
        assert_eq!(
            line,
            r#"{"key":"learned-use-tokio","type":"learned","content":"use tokio","source":"orchestrator","tags":["learned"],"ts":7,"bead":"bd-1"}"#
        );
    }

    #[test]
    fn test_entry_keeps_unknown_fields_and_types() {
        let line = r#"{"key":"note-x","type":"note","content":"x","source":"orchestrator","tags":[],"ts":1,"bead":"b","origin":"import"}"#;
        let entry: KnowledgeEntry = serde_json::from_str(line).unwrap();
        assert_eq!(entry.kind, EntryType::Other("note".to_string()));
        assert_eq!(entry.to_line().unwrap(), line);
    }

    #[test]
    fn test_entry_keeps_unknown_source() {
        let line = r#"{"key":"learned-x","type":"learned","content":"x","source":"import-script","tags":[],"ts":1,"bead":"b"}"#;
        let entry: KnowledgeEntry = serde_json::from_str(line).unwrap();
        assert_eq!(entry.source, EntrySource::Other("import-script".to_string()));
        assert_eq!(entry.source.to_string(), "import-script");
        assert_eq!(entry.to_line().unwrap(), line);
    }

    #[test]
    fn test_odd_field_shapes_still_parse() {
        let entry: KnowledgeEntry =
            serde_json::from_str(r#"{"key":"k","content":"x","ts":1700000000.5,"tags":"api, bug"}"#).unwrap();
        assert_eq!(entry.ts, 1_700_000_000);
        assert_eq!(entry.tags, vec!["api", "bug"]);

        let entry: KnowledgeEntry =
            serde_json::from_str(r#"{"key":7,"ts":"yesterday","tags":{"a":1},"bead":null}"#).unwrap();
        assert_eq!(entry.key, "7");
        assert_eq!(entry.ts, 0);
        assert!(entry.tags.is_empty());
        assert_eq!(entry.bead, "");
        assert_eq!(entry.source, EntrySource::default());
    }

    #[test]
    fn test_entry_type_label() {
        assert_eq!(EntryType::Learned.label(), "LEARN");
        assert_eq!(EntryType::Investigation.label(), "INVES");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("hi", 10), "hi");
    }
}
