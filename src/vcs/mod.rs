//! `git` and `gh` queries used by the hooks.

mod git;
mod github;

pub use git::*;
pub use github::*;
