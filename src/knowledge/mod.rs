//! Project knowledge: the append-only `LEARNED:` log and CLAUDE.md parsing.
//!
//! - [`KnowledgeStore`]: active/archive JSONL files with rotation
//! - [`capture`]: turns `bd comment` annotations into entries
//! - [`Recall`]: keyword search, recent entries and stats
//! - [`ClaudeMd`]: section lookup used by the pre-compact reminder

mod capture;
mod claude_md;
mod entry;
mod error;
mod recall;
mod store;

pub use capture::*;
pub use claude_md::*;
pub use entry::*;
pub use error::*;
pub use recall::*;
pub use store::*;
