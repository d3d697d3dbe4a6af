//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::runner::RunnerConfig;
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "vouch.toml";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Built-in defaults - lowest priority
/// 2. Project config (vouch.toml) - overrides defaults
/// 3. Environment variables (VOUCH_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Skip environment overrides (used by tests and embedders)
    ignore_env: bool,
}

/// Merged configuration result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    /// Resolved runner settings
    pub runner: RunnerConfig,

    /// Config file the settings came from, if any
    pub config_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { ignore_env: false }
    }

    /// Do not consult VOUCH_* environment variables
    pub fn without_env(mut self) -> Self {
        self.ignore_env = true;
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find vouch.toml; defaults apply when none exists.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<LoadedConfig> {
        let (config_file, runner) = match find_config_file(start_dir) {
            Some(path) => {
                let runner = RunnerConfig::load_from_file(&path)?;
                (Some(path), runner)
            }
            None => (None, RunnerConfig::default()),
        };

        Ok(LoadedConfig {
            runner: self.apply_env_overrides(runner)?,
            config_file,
        })
    }

    /// Load configuration from a specific config file
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<LoadedConfig> {
        let runner = RunnerConfig::load_from_file(config_path)?;

        Ok(LoadedConfig {
            runner: self.apply_env_overrides(runner)?,
            config_file: Some(config_path.to_path_buf()),
        })
    }

    /// Apply environment variable overrides to the runner config
    ///
    /// Recognised: VOUCH_FILE_GLOB, VOUCH_VERBOSITY, VOUCH_HOOK_FAILURE,
    /// VOUCH_NO_COLOR and the standard NO_COLOR.
    fn apply_env_overrides(&self, mut config: RunnerConfig) -> ConfigResult<RunnerConfig> {
        if self.ignore_env {
            return Ok(config);
        }

        if let Ok(glob) = env::var("VOUCH_FILE_GLOB") {
            config.file_glob = glob;
        }

        if let Ok(verbosity) = env::var("VOUCH_VERBOSITY") {
            config.verbosity = verbosity.parse().map_err(|e| env_error("VOUCH_VERBOSITY", e))?;
        }

        if let Ok(policy) = env::var("VOUCH_HOOK_FAILURE") {
            config.hook_failure = policy
                .parse()
                .map_err(|e| env_error("VOUCH_HOOK_FAILURE", e))?;
        }

        if env::var("VOUCH_NO_COLOR").is_ok() || env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        config.validate()?;
        Ok(config)
    }
}

fn env_error(var: &str, source: ConfigError) -> ConfigError {
    match source {
        ConfigError::InvalidValue { reason, .. } => ConfigError::InvalidValue {
            field: var.to_string(),
            reason,
        },
        other => other,
    }
}

/// Find vouch.toml in `start_dir` or any of its ancestors
fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

impl LoadedConfig {
    /// Directory containing the config file, if one was found
    pub fn project_root(&self) -> Option<&Path> {
        self.config_file.as_deref().and_then(Path::parent)
    }

    /// Check if a vouch.toml was found
    pub fn is_project(&self) -> bool {
        self.config_file.is_some()
    }
}
