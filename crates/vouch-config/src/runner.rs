//! Runner Configuration (`[runner]` in vouch.toml)
//!
//! Controls which test modules are loaded and how much the runner prints.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Glob used when neither the config file nor the environment names one
pub const DEFAULT_FILE_GLOB: &str = "**/*_test.rs";

/// Console verbosity of a test run
///
/// Ordered from quietest to loudest, so `verbosity >= Verbosity::Info`
/// reads as "at least suite-level output".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verbosity {
    /// Only the final run summary
    Summary,
    /// Suite-level summaries
    #[default]
    Info,
    /// Per-test PASS/FAIL/SKIP lines and blank separators
    Verbose,
}

impl Verbosity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Summary => "SUMMARY",
            Verbosity::Info => "INFO",
            Verbosity::Verbose => "VERBOSE",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verbosity {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUMMARY" => Ok(Verbosity::Summary),
            "INFO" => Ok(Verbosity::Info),
            "VERBOSE" => Ok(Verbosity::Verbose),
            other => Err(ConfigError::InvalidValue {
                field: "verbosity".to_string(),
                reason: format!("expected SUMMARY, INFO or VERBOSE, got '{}'", other),
            }),
        }
    }
}

/// What happens to the run when a lifecycle hook fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookFailurePolicy {
    /// Stop the whole run and surface the hook error to the caller
    #[default]
    AbortRun,
    /// Abandon the failing suite, count its unfinished tests as failed, keep going
    AbortSuite,
}

impl FromStr for HookFailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort-run" | "run" => Ok(HookFailurePolicy::AbortRun),
            "abort-suite" | "suite" => Ok(HookFailurePolicy::AbortSuite),
            other => Err(ConfigError::InvalidValue {
                field: "hook_failure".to_string(),
                reason: format!("expected abort-run or abort-suite, got '{}'", other),
            }),
        }
    }
}

/// Runner settings, fully resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Glob selecting which test modules get loaded
    pub file_glob: String,

    /// Console verbosity
    pub verbosity: Verbosity,

    /// Scope of a lifecycle hook failure
    pub hook_failure: HookFailurePolicy,

    /// Disable colored output
    pub no_color: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            file_glob: DEFAULT_FILE_GLOB.to_string(),
            verbosity: Verbosity::default(),
            hook_failure: HookFailurePolicy::default(),
            no_color: false,
        }
    }
}

/// Top-level layout of vouch.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub runner: RunnerConfig,
}

impl RunnerConfig {
    /// Create a config for the given glob with every other setting defaulted
    pub fn with_glob(file_glob: impl Into<String>) -> Self {
        Self {
            file_glob: file_glob.into(),
            ..Self::default()
        }
    }

    /// Load the `[runner]` section of a config file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        file.runner.validate()?;
        Ok(file.runner)
    }

    /// Validate the runner configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.file_glob.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "runner.file_glob".to_string(),
                reason: "glob cannot be empty".to_string(),
            });
        }

        glob::Pattern::new(&self.file_glob).map_err(|e| ConfigError::InvalidValue {
            field: "runner.file_glob".to_string(),
            reason: e.to_string(),
        })?;

        Ok(())
    }
}
