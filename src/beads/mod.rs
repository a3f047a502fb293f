//! Client for the `bd` task tracker.
//!
//! `bd` is an opaque collaborator: every call goes through a
//! [`CommandRunner`](crate::probe::CommandRunner) and any failure shows up
//! as [`Probe::Unknown`](crate::probe::Probe::Unknown).

mod client;
mod id;
mod record;

pub use client::*;
pub use id::*;
pub use record::*;
