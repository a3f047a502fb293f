//! CLI subcommands that edit files outside the hook protocol.

mod install_hooks;

pub use install_hooks::*;
