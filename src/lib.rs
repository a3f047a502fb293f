//! Beads Guard - workflow enforcement hooks and a knowledge log for
//! bead-driven Claude Code orchestration.

pub mod beads;
pub mod commands;
pub mod config;
pub mod display;
pub mod hooks;
pub mod knowledge;
pub mod probe;
pub mod transcript;
pub mod vcs;
pub mod worktree;
