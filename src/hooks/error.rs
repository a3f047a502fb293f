//! Hook error types.

use std::path::PathBuf;

use crate::knowledge::KnowledgeError;

/// Errors a rule can hit. None of them reach the caller: the handler
/// records them and treats the rule as passed.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize hook output: {0}")]
    Serialize(#[from] serde_json::Error),
}
