//! Append-only knowledge log with size-bounded rotation.
//!
//! Two newline-delimited JSON files live under the memory directory:
//! `knowledge.jsonl` (active) and `knowledge.archive.jsonl` (archive).
//! Entries are only ever appended. When the active file grows past
//! `max_active_lines`, the oldest `rotate_batch` lines move to the end of
//! the archive.
//!
//! Writers are not coordinated. Two rotations racing on the active file can
//! lose or duplicate lines, and a crash between the archive append and the
//! active rewrite leaves the moved batch in both files.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::KnowledgeConfig;

use super::entry::KnowledgeEntry;
use super::error::KnowledgeError;

/// File name of the active log.
pub const ACTIVE_FILE: &str = "knowledge.jsonl";
/// File name of the archive log.
pub const ARCHIVE_FILE: &str = "knowledge.archive.jsonl";

/// A parsed entry next to the compact JSON of the line it was read from.
///
/// `text` holds only what the writer stored, so keyword matching never sees
/// defaults filled in for missing fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEntry {
    pub entry: KnowledgeEntry,
    pub text: String,
}

/// What a rotation check did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Active log was within bounds.
    NotNeeded { lines: usize },
    /// Lines were moved to the archive.
    Rotated { archived: usize, kept: usize },
}

/// Handle on the pair of knowledge log files.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    dir: PathBuf,
    max_active_lines: usize,
    rotate_batch: usize,
}

impl KnowledgeStore {
    /// Store rooted at `<project_dir>/<memory_dir>`.
    #[must_use]
    pub fn for_project(project_dir: &Path, config: &KnowledgeConfig) -> Self {
        Self::new(project_dir.join(&config.memory_dir), config)
    }

    /// Store rooted at an explicit memory directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, config: &KnowledgeConfig) -> Self {
        Self {
            dir: dir.into(),
            max_active_lines: config.max_active_lines,
            rotate_batch: config.rotate_batch,
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn active_path(&self) -> PathBuf {
        self.dir.join(ACTIVE_FILE)
    }

    #[must_use]
    pub fn archive_path(&self) -> PathBuf {
        self.dir.join(ARCHIVE_FILE)
    }

    /// Append one entry to the active log, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn append(&self, entry: &KnowledgeEntry) -> Result<(), KnowledgeError> {
        let line = entry.to_line()?;

        fs::create_dir_all(&self.dir).map_err(|source| KnowledgeError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.active_path();
        append_lines(&path, &[line.as_str()]).map_err(|source| KnowledgeError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(key = %entry.key, path = %path.display(), "Appended knowledge entry");
        Ok(())
    }

    /// Move the oldest batch to the archive if the active log is over its bound.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or written.
    pub fn rotate_if_needed(&self) -> Result<Rotation, KnowledgeError> {
        let active = self.active_path();
        let lines = read_lines(&active)?;

        if lines.len() <= self.max_active_lines {
            return Ok(Rotation::NotNeeded { lines: lines.len() });
        }

        let split = self.rotate_batch.min(lines.len());
        let (to_archive, to_keep) = lines.split_at(split);

        let archive = self.archive_path();
        let archived: Vec<&str> = to_archive.iter().map(String::as_str).collect();
        append_lines(&archive, &archived).map_err(|source| KnowledgeError::Write {
            path: archive.clone(),
            source,
        })?;

        let mut rewritten = to_keep.join("\n");
        if !rewritten.is_empty() {
            rewritten.push('\n');
        }
        fs::write(&active, rewritten).map_err(|source| KnowledgeError::Write {
            path: active.clone(),
            source,
        })?;

        tracing::info!(
            archived = to_archive.len(),
            kept = to_keep.len(),
            "Rotated knowledge log"
        );
        Ok(Rotation::Rotated {
            archived: to_archive.len(),
            kept: to_keep.len(),
        })
    }

    /// Number of non-empty lines in the active log (malformed ones included).
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn active_line_count(&self) -> Result<usize, KnowledgeError> {
        Ok(read_lines(&self.active_path())?.len())
    }

    /// Entries parsed from the last `n` lines of the active log, along with
    /// the total line count.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn tail_active(&self, n: usize) -> Result<(usize, Vec<KnowledgeEntry>), KnowledgeError> {
        let lines = read_lines(&self.active_path())?;
        let start = lines.len().saturating_sub(n);
        Ok((lines.len(), parse_entries(&lines[start..].join("\n"))))
    }

    /// Parsed entries of the active log, in file order.
    #[must_use]
    pub fn read_active(&self) -> Vec<KnowledgeEntry> {
        read_entries(&self.active_path())
    }

    /// Parsed entries of the archive log, in file order.
    #[must_use]
    pub fn read_archive(&self) -> Vec<KnowledgeEntry> {
        read_entries(&self.archive_path())
    }

    /// Active log entries with their stored text, in file order.
    #[must_use]
    pub fn read_active_stored(&self) -> Vec<StoredEntry> {
        read_stored(&self.active_path())
    }

    /// Archive log entries with their stored text, in file order.
    #[must_use]
    pub fn read_archive_stored(&self) -> Vec<StoredEntry> {
        read_stored(&self.archive_path())
    }

    /// Whether the active log is missing or has zero bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        fs::metadata(self.active_path()).map_or(true, |m| m.len() == 0)
    }
}

/// Read every non-empty line; a missing file reads as empty.
fn read_lines(path: &Path) -> Result<Vec<String>, KnowledgeError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(source) => Err(KnowledgeError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parse a JSONL file leniently. Unreadable files yield nothing and each
/// malformed line is skipped on its own.
#[must_use]
pub fn read_entries(path: &Path) -> Vec<KnowledgeEntry> {
    read_stored(path).into_iter().map(|stored| stored.entry).collect()
}

/// Like [`read_entries`], keeping each line's stored text.
#[must_use]
pub fn read_stored(path: &Path) -> Vec<StoredEntry> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read knowledge log");
            return Vec::new();
        }
    };
    parse_stored(&content)
}

/// Parse JSONL content into entries, skipping malformed lines.
#[must_use]
pub fn parse_entries(content: &str) -> Vec<KnowledgeEntry> {
    parse_stored(content).into_iter().map(|stored| stored.entry).collect()
}

/// Parse JSONL content, keeping the compact form of every accepted line.
///
/// Any JSON object is accepted. Lines that are not JSON, or not an object,
/// are skipped.
#[must_use]
pub fn parse_stored(content: &str) -> Vec<StoredEntry> {
    content
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = serde_json::from_str::<Value>(line).and_then(|value| {
                let text = value.to_string();
                serde_json::from_value::<KnowledgeEntry>(value).map(|entry| StoredEntry { entry, text })
            });
            match parsed {
                Ok(stored) => Some(stored),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping malformed knowledge line");
                    None
                }
            }
        })
        .collect()
}

fn append_lines(path: &Path, lines: &[&str]) -> io::Result<()> {
    let mut buf = String::new();
    for line in lines {
        buf.push_str(line);
        buf.push('\n');
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(buf.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::{EntrySource, EntryType};

    fn small_config() -> KnowledgeConfig {
        KnowledgeConfig {
            max_active_lines: 10,
            rotate_batch: 5,
            ..KnowledgeConfig::default()
        }
    }

    fn entry(n: i64) -> KnowledgeEntry {
        KnowledgeEntry::new(
            EntryType::Learned,
            format!("fact number {n}"),
            EntrySource::Orchestrator,
            "bd-1",
            n,
        )
    }

    #[test]
    fn test_append_creates_directory() {
        let temp = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::for_project(temp.path(), &KnowledgeConfig::default());
        assert!(store.is_empty());

        store.append(&entry(1)).unwrap();

        assert!(store.active_path().exists());
        assert!(store.active_path().ends_with(".beads/memory/knowledge.jsonl"));
        let content = fs::read_to_string(store.active_path()).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_rotation_not_needed_at_bound() {
        let temp = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::new(temp.path(), &small_config());
        for n in 0..10 {
            store.append(&entry(n)).unwrap();
        }
        assert_eq!(store.rotate_if_needed().unwrap(), Rotation::NotNeeded { lines: 10 });
        assert!(!store.archive_path().exists());
    }

    #[test]
    fn test_rotation_moves_oldest_batch_in_order() {
        let temp = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::new(temp.path(), &small_config());
        for n in 0..11 {
            store.append(&entry(n)).unwrap();
        }
        let before = fs::read_to_string(store.active_path()).unwrap();
        let before: Vec<&str> = before.lines().collect();

        let outcome = store.rotate_if_needed().unwrap();
        assert_eq!(outcome, Rotation::Rotated { archived: 5, kept: 6 });

        let archive = fs::read_to_string(store.archive_path()).unwrap();
        assert_eq!(archive.lines().collect::<Vec<_>>(), &before[..5]);
        let active = fs::read_to_string(store.active_path()).unwrap();
        assert_eq!(active.lines().collect::<Vec<_>>(), &before[5..]);
    }

    #[test]
    fn test_rotation_appends_to_existing_archive() {
        let temp = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::new(temp.path(), &small_config());
        fs::write(store.archive_path(), "{\"key\":\"old\"}\n").unwrap();
        for n in 0..11 {
            store.append(&entry(n)).unwrap();
        }
        store.rotate_if_needed().unwrap();

        let archive = fs::read_to_string(store.archive_path()).unwrap();
        let lines: Vec<&str> = archive.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "{\"key\":\"old\"}");
    }

    #[test]
    fn test_malformed_lines_counted_but_not_parsed() {
        let temp = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::new(temp.path(), &small_config());
        store.append(&entry(1)).unwrap();
        let mut file = OpenOptions::new().append(true).open(store.active_path()).unwrap();
        writeln!(file, "{{not json").unwrap();
        drop(file);
        store.append(&entry(2)).unwrap();

        assert_eq!(store.active_line_count().unwrap(), 3);
        let entries = store.read_active();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].ts, 2);
    }

    #[test]
    fn test_every_json_object_line_is_kept() {
        let temp = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::new(temp.path(), &small_config());
        store.append(&entry(1)).unwrap();
        let mut file = OpenOptions::new().append(true).open(store.active_path()).unwrap();
        writeln!(file, r#"{{"key":"learned-float","content":"float ts","ts":1700000000.5}}"#).unwrap();
        writeln!(file, r#"{{"key":"learned-str","content":"string tags","tags":"a,b","ts":3}}"#).unwrap();
        writeln!(file, "[1,2]").unwrap();
        drop(file);

        let entries = store.read_active();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].ts, 1_700_000_000);
        assert_eq!(entries[2].tags, vec!["a", "b"]);
    }

    #[test]
    fn test_stored_text_is_the_written_line() {
        let stored = parse_stored("{\"key\": \"learned-x\", \"content\": \"x\"}\n");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].text, r#"{"key":"learned-x","content":"x"}"#);
        assert!(stored[0].entry.tags.is_empty());
    }

    #[test]
    fn test_read_missing_files() {
        let temp = tempfile::tempdir().unwrap();
        let store = KnowledgeStore::new(temp.path().join("absent"), &small_config());
        assert!(store.read_active().is_empty());
        assert!(store.read_archive().is_empty());
        assert_eq!(store.active_line_count().unwrap(), 0);
        assert_eq!(store.rotate_if_needed().unwrap(), Rotation::NotNeeded { lines: 0 });
    }
}
