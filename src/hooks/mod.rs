//! Hook handlers for Claude Code events.
//!
//! Each invocation reads one JSON envelope from stdin, runs the rules
//! registered for the event and prints at most one response. Hooks fail
//! open: a rule that errors is logged and skipped, and the process always
//! exits 0.
//!
//! # Components
//!
//! - [`HookHandler`]: runs an event's rule pipeline
//! - [`HookContext`]: project paths, config and the command runner
//! - [`rules`]: the individual policy rules
//! - [`HookOutput`]: the typed response printed to stdout

mod context;
mod diagnostics;
mod error;
mod event;
mod handler;
mod input;
mod output;
pub mod rules;

pub use context::*;
pub use diagnostics::*;
pub use error::*;
pub use event::*;
pub use handler::*;
pub use input::*;
pub use output::*;
pub use rules::{Rule, RuleOutcome};
