//! Colored terminal output for the `recall` command.
//!
//! Rendering goes through the plain formatters in [`crate::knowledge`];
//! this module only adds color when stdout is a terminal.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;

use crate::knowledge::{format_entry, format_recent_entry, KnowledgeEntry, KnowledgeStats};

/// Usage line printed when `recall` is run without a query.
pub const RECALL_USAGE: &str =
    "Usage: beads-guard recall <keyword> [--type learned] [--all] [--recent N] [--stats]";

/// Whether stdout should get ANSI colors.
#[must_use]
pub fn use_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Color the label line of an entry block and dim its metadata line.
fn paint_entry(block: &str, color: bool) -> String {
    if !color {
        return block.to_string();
    }
    let mut out = String::new();
    for (i, line) in block.lines().enumerate() {
        let painted = match i {
            0 => line.cyan().bold().to_string(),
            2 => line.dimmed().to_string(),
            _ => line.to_string(),
        };
        out.push_str(&painted);
        out.push('\n');
    }
    out
}

fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

#[must_use]
pub fn render_empty_store() -> String {
    "No knowledge entries yet.\n\
     Entries are created automatically from bd comment commands with LEARNED: prefixes.\n"
        .to_string()
}

/// Search results, one block per entry separated by blank lines.
#[must_use]
pub fn render_search(query: &str, kind: Option<&str>, results: &[KnowledgeEntry], color: bool) -> String {
    if results.is_empty() {
        let mut out = format!("No knowledge entries matching '{query}'\n");
        if let Some(kind) = kind {
            out.push_str(&format!("  (filtered by type: {kind})\n"));
        }
        return out;
    }
    results
        .iter()
        .map(|e| format!("{}\n", paint_entry(&format_entry(e), color)))
        .collect()
}

/// `requested` is the N the user asked for; fewer entries may exist.
#[must_use]
pub fn render_recent(requested: usize, entries: &[KnowledgeEntry], color: bool) -> String {
    let mut out = heading(&format!("## Recent Knowledge ({requested} entries)"), color);
    out.push_str("\n\n");
    for entry in entries {
        out.push_str(&paint_entry(&format_recent_entry(entry), color));
        out.push('\n');
    }
    out
}

#[must_use]
pub fn render_stats(stats: &KnowledgeStats, color: bool) -> String {
    format!(
        "{}\n  Active entries: {}\n  Unique keys:    {}\n  Learned:        {}\n  Investigation:  {}\n  Archived:       {}\n",
        heading("## Knowledge Base Stats", color),
        stats.active,
        stats.unique_keys,
        stats.learned,
        stats.investigation,
        stats.archived
    )
}

/// Write rendered output to stdout. A closed pipe is not an error.
pub fn print(text: &str) {
    write_quietly(&mut io::stdout().lock(), text);
}

/// Write and flush, dropping any I/O error.
pub fn write_quietly(out: &mut impl Write, text: &str) {
    let _ = out.write_all(text.as_bytes());
    let _ = out.flush();
}
