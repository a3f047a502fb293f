//! Bead worktrees: one git worktree per bead at `.worktrees/bd-<id>`.
//!
//! Hooks never create or remove worktrees; they only inspect them to decide
//! whether an edit is isolated and which finished worktrees can be cleaned up.

mod list;
mod paths;
mod types;

pub use list::parse_worktree_list;
pub use paths::{contains_path_segment, file_name};
pub use types::{worktree_path, Worktree};
