//! Knowledge store error types.

use std::path::PathBuf;

/// Errors that can occur while writing or reading the knowledge log.
#[derive(thiserror::Error, Debug)]
pub enum KnowledgeError {
    /// Failed to create the memory directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a log file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to append to or rewrite a log file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize an entry.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
