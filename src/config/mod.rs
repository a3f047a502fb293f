//! Configuration module.

mod claude_settings;
mod loader;
mod types;
mod worktree;

pub use claude_settings::*;
pub use loader::*;
pub use types::*;
pub use worktree::*;
