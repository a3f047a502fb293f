//! Outcomes of external checks.
//!
//! Every `git`, `bd` and `gh` call made by a hook goes through a
//! [`CommandRunner`] and comes back as a [`Probe`]. A probe that timed out,
//! failed to spawn, exited nonzero or printed unparsable output is
//! [`Probe::Unknown`], and the check depending on it is skipped.

mod fake;
mod runner;

pub use fake::*;
pub use runner::*;

/// Result of asking an external tool something.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe<T> {
    /// The tool answered.
    Known(T),
    /// The tool could not answer; callers must not enforce on this.
    Unknown,
}

impl<T> Probe<T> {
    #[must_use]
    pub fn known(self) -> Option<T> {
        match self {
            Self::Known(v) => Some(v),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    #[must_use]
    pub fn as_ref(&self) -> Probe<&T> {
        match self {
            Self::Known(v) => Probe::Known(v),
            Self::Unknown => Probe::Unknown,
        }
    }

    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Probe<U> {
        match self {
            Self::Known(v) => Probe::Known(f(v)),
            Self::Unknown => Probe::Unknown,
        }
    }

    #[must_use]
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Probe<U>) -> Probe<U> {
        match self {
            Self::Known(v) => f(v),
            Self::Unknown => Probe::Unknown,
        }
    }
}

impl<T> From<Option<T>> for Probe<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }
}

impl Probe<String> {
    /// Known and non-empty output.
    ///
    /// Several CLIs answer "no" by printing nothing (`git ls-remote`,
    /// `git status --porcelain`), so emptiness is a meaningful answer.
    #[must_use]
    pub fn non_empty(&self) -> Probe<bool> {
        self.as_ref().map(|s| !s.is_empty())
    }

    /// Parse known output as JSON. Parse failures become `Unknown`.
    #[must_use]
    pub fn json<T: serde::de::DeserializeOwned>(self) -> Probe<T> {
        self.and_then(|raw| match serde_json::from_str(&raw) {
            Ok(v) => Probe::Known(v),
            Err(e) => {
                tracing::debug!(error = %e, "Unparsable JSON from external command");
                Probe::Unknown
            }
        })
    }
}
