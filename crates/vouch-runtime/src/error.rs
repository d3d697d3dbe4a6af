//! Error types for registration, discovery and lifecycle hooks
//!
//! Test-body failures are not errors at this level: they are caught at the
//! single-test boundary and surface as [`crate::TestOutcome::Fail`].

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Rejected registrations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("suite '{0}' is already registered")]
    DuplicateSuite(String),

    #[error("test '{test}' is already registered in suite '{suite}'")]
    DuplicateTest { suite: String, test: String },

    #[error("cannot register test '{test}': suite '{suite}' is not registered")]
    UnknownSuite { suite: String, test: String },
}

/// Failures while resolving or loading test modules
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("invalid test file glob '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to load test module {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

/// Lifecycle stage a hook belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookStage {
    BeforeAll,
    BeforeEach,
    AfterEach,
    AfterAll,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HookStage::BeforeAll => "beforeAll",
            HookStage::BeforeEach => "beforeEach",
            HookStage::AfterEach => "afterEach",
            HookStage::AfterAll => "afterAll",
        })
    }
}

/// Whether a hook was installed for the whole run or declared by a suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookScope {
    Global,
    Suite,
}

impl fmt::Display for HookScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HookScope::Global => "global",
            HookScope::Suite => "suite",
        })
    }
}

/// A lifecycle hook raised an error
///
/// Never recovered by the suite executor; the configured
/// [`vouch_config::HookFailurePolicy`] decides how far it propagates.
#[derive(Error, Debug)]
#[error("{scope} {stage} hook failed in suite '{suite}': {source}")]
pub struct HookError {
    pub suite: String,
    pub scope: HookScope,
    pub stage: HookStage,
    #[source]
    pub source: BoxError,
}

impl HookError {
    pub fn new(
        suite: impl Into<String>,
        scope: HookScope,
        stage: HookStage,
        source: anyhow::Error,
    ) -> Self {
        Self {
            suite: suite.into(),
            scope,
            stage,
            source: source.into(),
        }
    }
}
