//! Bead identifiers embedded in prompts and commands.

use std::sync::LazyLock;

use regex::Regex;

static BEAD_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"BEAD_ID:\s*([A-Za-z0-9._-]+)").expect("valid regex"));

static CHILD_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[0-9]+$").expect("valid regex"));

/// Marker a supervisor dispatch prompt must carry.
pub const BEAD_ID_MARKER: &str = "BEAD_ID:";

/// The id after `BEAD_ID:`, if any.
#[must_use]
pub fn parse_bead_id(text: &str) -> Option<&str> {
    BEAD_ID
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Epic children are named `<epic>.<n>`.
#[must_use]
pub fn is_epic_child(id: &str) -> bool {
    id.contains('.')
}

/// Parent epic of a child id: the id without its trailing `.<digits>`.
#[must_use]
pub fn epic_of(id: &str) -> &str {
    CHILD_SUFFIX.find(id).map_or(id, |m| &id[..m.start()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bead_id() {
        assert_eq!(parse_bead_id("Do it\nBEAD_ID: bd-12.3, EPIC_ID: bd-12"), Some("bd-12.3"));
        assert_eq!(parse_bead_id("BEAD_ID:abc_1"), Some("abc_1"));
        assert_eq!(parse_bead_id("BEAD_ID: "), None);
        assert_eq!(parse_bead_id("no marker"), None);
    }

    #[test]
    fn test_epic_of() {
        assert!(is_epic_child("bd-12.3"));
        assert!(!is_epic_child("bd-12"));
        assert_eq!(epic_of("bd-12.3"), "bd-12");
        assert_eq!(epic_of("bd-12.x"), "bd-12.x");
    }
}
