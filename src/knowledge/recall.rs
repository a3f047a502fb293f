//! Read-only queries over the knowledge store.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use super::entry::{truncate_chars, EntryType, KnowledgeEntry};
use super::store::KnowledgeStore;

/// Default number of entries returned by [`Recall::recent`].
pub const DEFAULT_RECENT: usize = 10;

/// Parameters of a keyword search.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against each stored line.
    pub keyword: String,
    /// Keep only entries whose type equals this exactly.
    pub kind: Option<String>,
    /// Search the archive as well as the active log.
    pub include_archive: bool,
}

impl SearchQuery {
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_archive(mut self) -> Self {
        self.include_archive = true;
        self
    }
}

/// Counts reported by `recall --stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KnowledgeStats {
    pub active: usize,
    pub unique_keys: usize,
    pub learned: usize,
    pub investigation: usize,
    pub archived: usize,
}

/// Query surface over a [`KnowledgeStore`].
#[derive(Debug, Clone, Copy)]
pub struct Recall<'a> {
    store: &'a KnowledgeStore,
}

impl<'a> Recall<'a> {
    #[must_use]
    pub fn new(store: &'a KnowledgeStore) -> Self {
        Self { store }
    }

    /// Entries matching the query, one per key (newest wins), newest first.
    #[must_use]
    pub fn search(&self, query: &SearchQuery) -> Vec<KnowledgeEntry> {
        let mut stored = if query.include_archive {
            self.store.read_archive_stored()
        } else {
            Vec::new()
        };
        stored.extend(self.store.read_active_stored());

        let needle = query.keyword.to_lowercase();
        let matched = stored
            .into_iter()
            .filter(|s| {
                query.kind.as_deref().map_or(true, |k| s.entry.kind.as_str() == k)
                    && s.text.to_lowercase().contains(&needle)
            })
            .map(|s| s.entry);

        newest_first(dedupe_latest(matched))
    }

    /// The last `n` active lines, one entry per key (newest wins), oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<KnowledgeEntry> {
        let mut entries = self.store.read_active();
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
        dedupe_in_place(entries)
    }

    #[must_use]
    pub fn stats(&self) -> KnowledgeStats {
        let active = self.store.read_active();
        let unique: HashSet<&str> =
            active.iter().map(|e| e.key.as_str()).collect();

        KnowledgeStats {
            active: active.len(),
            unique_keys: unique.len(),
            learned: active.iter().filter(|e| e.kind == EntryType::Learned).count(),
            investigation: active
                .iter()
                .filter(|e| e.kind == EntryType::Investigation)
                .count(),
            archived: self.store.read_archive().len(),
        }
    }
}

/// Keep one entry per key: the one with the largest `ts`. On a tie the
/// first one seen stays. Output follows first-seen key order.
#[must_use]
pub fn dedupe_latest(entries: impl IntoIterator<Item = KnowledgeEntry>) -> Vec<KnowledgeEntry> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<KnowledgeEntry> = Vec::new();

    for entry in entries {
        match slots.get(&entry.key) {
            Some(&idx) => {
                if entry.ts > kept[idx].ts {
                    kept[idx] = entry;
                }
            }
            None => {
                slots.insert(entry.key.clone(), kept.len());
                kept.push(entry);
            }
        }
    }
    kept
}

/// Keep one entry per key like [`dedupe_latest`], but every survivor stays
/// at its own position in the input.
#[must_use]
pub fn dedupe_in_place(entries: Vec<KnowledgeEntry>) -> Vec<KnowledgeEntry> {
    let mut winners: HashMap<&str, usize> = HashMap::new();
    for (idx, entry) in entries.iter().enumerate() {
        match winners.get(entry.key.as_str()) {
            Some(&best) if entries[best].ts >= entry.ts => {}
            _ => {
                winners.insert(entry.key.as_str(), idx);
            }
        }
    }
    let keep: HashSet<usize> = winners.into_values().collect();

    entries
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| keep.contains(idx))
        .map(|(_, entry)| entry)
        .collect()
}

/// Stable sort by `ts`, newest first.
#[must_use]
pub fn newest_first(mut entries: Vec<KnowledgeEntry>) -> Vec<KnowledgeEntry> {
    entries.sort_by(|a, b| b.ts.cmp(&a.ts));
    entries
}

/// Search result block: label, key, content snippet, metadata with tags.
#[must_use]
pub fn format_entry(entry: &KnowledgeEntry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", entry.kind.label(), entry.key);
    let _ = writeln!(out, "  {}", truncate_chars(&entry.content, 200));
    let _ = writeln!(
        out,
        "  source={} bead={} tags={}",
        entry.source,
        entry.bead,
        entry.tags.join(",")
    );
    out
}

/// Recent listing block: shorter snippet and no tags.
#[must_use]
pub fn format_recent_entry(entry: &KnowledgeEntry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", entry.kind.label(), entry.key);
    let _ = writeln!(out, "  {}", truncate_chars(&entry.content, 120));
    let _ = writeln!(out, "  source={} bead={}", entry.source, entry.bead);
    out
}

/// One-line summary used in session context.
#[must_use]
pub fn format_summary_line(entry: &KnowledgeEntry) -> String {
    format!(
        "  [{}] {}  ({})",
        entry.kind.label(),
        truncate_chars(&entry.content, 100),
        entry.source
    )
}
