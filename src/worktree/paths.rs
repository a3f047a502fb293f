//! Separator-agnostic path checks.

/// Whether `path` contains `segment` as a whole path segment (or segments,
/// for values like `.claude/plans`). Backslashes are treated as `/`.
#[must_use]
pub fn contains_path_segment(path: &str, segment: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    let normalised = path.replace('\\', "/");
    normalised.contains(&format!("/{segment}/")) || normalised.ends_with(&format!("/{segment}"))
}

/// Final path component, accepting either separator.
#[must_use]
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
