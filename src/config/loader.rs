//! Configuration file loader.

use std::path::{Path, PathBuf};

use super::types::GuardConfig;

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = ".beads-guard.toml";

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a config loader with the default search paths for a project.
    #[must_use]
    pub fn new(project_dir: &Path) -> Self {
        let mut search_paths = Vec::new();

        // 1. Project root: .beads-guard.toml
        search_paths.push(project_dir.join(PROJECT_CONFIG_FILE));

        // 2. User config directory: ~/.config/beads-guard/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("beads-guard").join("config.toml"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// `--config` if given, otherwise the default search for `project_dir`.
    #[must_use]
    pub fn resolve(explicit: Option<PathBuf>, project_dir: &Path) -> Self {
        explicit.map_or_else(|| Self::new(project_dir), Self::with_path)
    }

    /// Load configuration from the first available file, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<GuardConfig, ConfigError> {
        match self.find_config_file() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading config file");
                Self::load_from_path(&path)
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(GuardConfig::default())
            }
        }
    }

    /// Load configuration from a specific path.
    fn load_from_path(path: &Path) -> Result<GuardConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find the first config file that exists.
    #[must_use]
    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.search_paths.iter().find(|p| p.exists()).cloned()
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_loader_default_paths() {
        let loader = ConfigLoader::new(Path::new("/repo"));
        assert_eq!(loader.search_paths()[0], PathBuf::from("/repo/.beads-guard.toml"));
    }

    #[test]
    fn test_config_loader_returns_defaults_when_no_file() {
        let loader = ConfigLoader::with_path(PathBuf::from("/nonexistent/path.toml"));
        let config = loader.load().unwrap();
        assert_eq!(config.commands.timeout_secs, 10);
        assert_eq!(config.worktree.dir, ".worktrees");
    }

    #[test]
    fn test_project_file_found() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            "[branches]\nprotected = [\"trunk\"]\n",
        )
        .unwrap();

        let config = ConfigLoader::resolve(None, temp.path()).load().unwrap();
        assert!(config.branches.is_protected("trunk"));
        assert!(!config.branches.is_protected("main"));
    }

    #[test]
    fn test_parse_toml_config() {
        let toml_str = r#"
            [knowledge]
            max_active_lines = 50
            rotate_batch = 20

            [commands]
            timeout_secs = 3

            [worktree]
            dir = ".trees"

            [limits]
            completion_lines = 30

            [delegation]
            codex_agents = ["scout"]
        "#;

        let config: GuardConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.knowledge.max_active_lines, 50);
        assert_eq!(config.knowledge.rotate_batch, 20);
        assert_eq!(config.commands.timeout_secs, 3);
        assert_eq!(config.worktree.dir, ".trees");
        assert_eq!(config.worktree.branch_prefix, "bd-");
        assert_eq!(config.limits.completion_lines, 30);
        assert_eq!(config.limits.completion_chars, 800);
        assert_eq!(config.delegation.codex_agents, ["scout"]);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "[commands]\ntimeout_secs = \"soon\"\n").unwrap();

        let err = ConfigLoader::with_path(path).load().unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
