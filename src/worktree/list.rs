//! Parsing `git worktree list --porcelain`.

use std::path::PathBuf;

use super::types::Worktree;

/// Parse porcelain output into worktrees, in listing order.
#[must_use]
pub fn parse_worktree_list(output: &str) -> Vec<Worktree> {
    let mut worktrees = Vec::new();
    let mut current_path: Option<PathBuf> = None;
    let mut current_branch: Option<String> = None;

    for line in output.lines() {
        if let Some(path) = line.strip_prefix("worktree ") {
            if let Some(path) = current_path.take() {
                worktrees.push(Worktree::new(path, current_branch.take()));
            }
            current_path = Some(PathBuf::from(path.trim()));
        } else if let Some(branch) = line.strip_prefix("branch refs/heads/") {
            current_branch = Some(branch.to_string());
        }
    }

    if let Some(path) = current_path {
        worktrees.push(Worktree::new(path, current_branch));
    }

    worktrees
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_porcelain() {
        let output = "worktree /repo\nHEAD abc\nbranch refs/heads/main\n\n\
                      worktree /repo/.worktrees/bd-1\nHEAD def\nbranch refs/heads/bd-1\n\n\
                      worktree /repo/.worktrees/bd-2\nHEAD 123\ndetached\n";
        let list = parse_worktree_list(output);
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].branch.as_deref(), Some("main"));
        assert_eq!(list[1].name, "bd-1");
        assert_eq!(list[2].branch, None);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_worktree_list("").is_empty());
    }
}
