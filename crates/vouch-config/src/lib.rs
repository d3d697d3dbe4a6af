//! Vouch Configuration System
//!
//! Provides configuration for the vouch test runner:
//! - Runner settings (`[runner]` in vouch.toml)
//! - Environment variable overrides (VOUCH_*)
//! - Validation of the test file glob and verbosity levels
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Project config (./vouch.toml, searched upward)
//! 3. Environment variables (VOUCH_*, NO_COLOR)
//! 4. CLI flags (applied by the harness)
//!
//! # Example
//!
//! ```no_run
//! use vouch_config::ConfigLoader;
//! use std::path::Path;
//!
//! let loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("running tests matching {}", config.runner.file_glob);
//! ```

pub mod loader;
pub mod runner;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use loader::{ConfigLoader, LoadedConfig, CONFIG_FILE_NAME};
pub use runner::{HookFailurePolicy, RunnerConfig, Verbosity};
