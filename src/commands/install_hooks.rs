//! Hook installer command.
//!
//! This module provides functionality to install and uninstall beads-guard
//! hooks into Claude Code's settings.json.

use std::path::{Path, PathBuf};

use crate::config::{ClaudeSettings, HookEntry, HookMatcher, HooksConfig, SettingsError};
use crate::hooks::HookEvent;

/// Default timeout for hooks in milliseconds.
pub const DEFAULT_HOOK_TIMEOUT: u32 = 5000;

/// Result of a hook installation operation.
#[derive(Debug)]
pub struct InstallResult {
    /// Path to the settings file that was modified.
    pub settings_path: PathBuf,
    /// Events a hook is now registered for.
    pub installed: Vec<HookEvent>,
    /// Whether any existing hooks were replaced.
    pub replaced_existing: bool,
}

/// Result of a hook uninstallation operation.
#[derive(Debug)]
pub struct UninstallResult {
    /// Path to the settings file that was modified.
    pub settings_path: PathBuf,
    /// Events a hook was removed from.
    pub removed: Vec<HookEvent>,
}

/// Errors that can occur during hook installation.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// Could not determine home directory.
    #[error("Could not determine home directory")]
    NoHomeDir,
    /// Settings file error.
    #[error("Settings error: {0}")]
    SettingsError(#[from] SettingsError),
    /// Could not determine current executable path.
    #[error("Could not determine current executable path: {0}")]
    CurrentExeError(std::io::Error),
}

/// Installs beads-guard hooks into Claude Code settings.
#[derive(Debug)]
pub struct HookInstaller {
    /// Path to the beads-guard binary.
    binary_path: PathBuf,
    /// Path to Claude settings.json.
    settings_path: PathBuf,
    /// Timeout for hooks in milliseconds.
    timeout: u32,
}

impl HookInstaller {
    /// Creates a hook installer targeting the user settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new(binary_path: PathBuf) -> Result<Self, InstallError> {
        let settings_path = ClaudeSettings::default_path().ok_or(InstallError::NoHomeDir)?;
        Ok(Self::with_paths(binary_path, settings_path))
    }

    /// Creates a hook installer targeting `<project>/.claude/settings.json`.
    #[must_use]
    pub fn for_project(binary_path: PathBuf, project_dir: &Path) -> Self {
        Self::with_paths(binary_path, ClaudeSettings::project_path(project_dir))
    }

    fn with_paths(binary_path: PathBuf, settings_path: PathBuf) -> Self {
        Self {
            binary_path,
            settings_path,
            timeout: DEFAULT_HOOK_TIMEOUT,
        }
    }

    /// Path of the running executable.
    ///
    /// # Errors
    ///
    /// Returns an error if the current executable path cannot be determined.
    pub fn current_exe() -> Result<PathBuf, InstallError> {
        std::env::current_exe().map_err(InstallError::CurrentExeError)
    }

    /// Sets a custom settings path.
    #[must_use]
    pub fn with_settings_path(mut self, path: PathBuf) -> Self {
        self.settings_path = path;
        self
    }

    /// Sets a custom timeout for hooks.
    #[must_use]
    pub fn with_timeout(mut self, timeout: u32) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Generates the hook command for a given event. The binary path is
    /// shell-quoted since Claude Code runs the command through a shell.
    #[must_use]
    pub fn generate_hook_command(&self, event: HookEvent) -> String {
        let binary = self.binary_path.to_string_lossy();
        format!("{} hook {}", shell_escape::escape(binary), event.cli_arg())
    }

    fn matcher_group(&self, event: HookEvent) -> HookMatcher {
        HookMatcher::new(
            event.matcher(),
            vec![HookEntry::command(self.generate_hook_command(event), self.timeout)],
        )
    }

    /// Installs a hook for every event into Claude settings.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be read or written.
    pub fn install(&self) -> Result<InstallResult, InstallError> {
        let mut settings = ClaudeSettings::load_from(&self.settings_path)?;
        let mut replaced_existing = false;

        let hooks = settings.hooks.get_or_insert_with(HooksConfig::default);
        for event in HookEvent::ALL {
            let group = self.matcher_group(event);
            Self::install_group(hooks.event_mut(event), group, &mut replaced_existing);
        }

        settings.save_to(&self.settings_path)?;
        tracing::info!(path = %self.settings_path.display(), "Installed hooks");

        Ok(InstallResult {
            settings_path: self.settings_path.clone(),
            installed: HookEvent::ALL.to_vec(),
            replaced_existing,
        })
    }

    /// Installs a matcher group, replacing any existing beads-guard group in place.
    fn install_group(groups: &mut Option<Vec<HookMatcher>>, group: HookMatcher, replaced: &mut bool) {
        let groups = groups.get_or_insert_with(Vec::new);

        if let Some(idx) = groups.iter().position(HookMatcher::is_guard_group) {
            if groups[idx] != group {
                groups[idx] = group;
                *replaced = true;
            }
        } else {
            groups.push(group);
        }
    }

    /// Uninstalls beads-guard hooks from Claude settings.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be read or written.
    pub fn uninstall(&self) -> Result<UninstallResult, InstallError> {
        let mut settings = ClaudeSettings::load_from(&self.settings_path)?;
        let mut removed = Vec::new();

        if let Some(ref mut hooks) = settings.hooks {
            for event in HookEvent::ALL {
                let section = hooks.event_mut(event);
                if Self::remove_guard_hooks(section) {
                    removed.push(event);
                }
            }

            if hooks.is_empty() {
                settings.hooks = None;
            }
        }

        settings.save_to(&self.settings_path)?;

        Ok(UninstallResult {
            settings_path: self.settings_path.clone(),
            removed,
        })
    }

    /// Strips our entries from every group, dropping groups and the section
    /// once they are empty. Returns whether anything was removed.
    fn remove_guard_hooks(section: &mut Option<Vec<HookMatcher>>) -> bool {
        let Some(groups) = section else {
            return false;
        };
        let mut removed = false;
        for group in groups.iter_mut() {
            let before_len = group.hooks.len();
            group.hooks.retain(|h| !h.is_guard_hook());
            removed |= group.hooks.len() < before_len;
        }
        groups.retain(|g| !g.hooks.is_empty());

        if groups.is_empty() {
            *section = None;
        }
        removed
    }
}
