//! Bead records as printed by `bd ... --json`.

use serde::{Deserialize, Serialize};

/// Statuses that mean a bead is finished.
pub const FINISHED_STATUSES: &[&str] = &["done", "closed"];

/// Status a supervisor must set before reporting completion.
pub const IN_REVIEW: &str = "inreview";

/// One bead. Only the fields the hooks read are typed; everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeadRecord {
    pub id: String,
    pub title: Option<String>,
    pub status: Option<String>,
    pub issue_type: Option<String>,
    /// Path of the epic's design document, if one was assigned.
    pub design: Option<String>,
}

impl BeadRecord {
    #[must_use]
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        FINISHED_STATUSES.contains(&self.status())
    }

    #[must_use]
    pub fn is_epic(&self) -> bool {
        self.issue_type.as_deref() == Some("epic")
    }

    /// Design path, treating an empty string as unset.
    #[must_use]
    pub fn design_path(&self) -> Option<&str> {
        self.design.as_deref().filter(|d| !d.is_empty())
    }
}
