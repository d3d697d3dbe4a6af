//! Test discovery - select and load test modules
//!
//! Test modules are compiled into the harness binary and listed in a
//! [`ModuleTable`] under their source path. Discovery selects the modules
//! whose path matches the configured glob and loads them in declaration
//! order; loading a module registers its suites.

use crate::error::DiscoveryError;
use crate::registry::{Registry, RegistryBuilder};
use crate::reporter::Reporter;
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};

/// Registers a module's suites
pub type ModuleLoader = fn(&mut RegistryBuilder) -> anyhow::Result<()>;

/// A test module known to the harness
#[derive(Debug, Clone)]
pub struct TestModule {
    pub path: PathBuf,
    pub loader: ModuleLoader,
}

impl TestModule {
    pub fn new(path: impl Into<PathBuf>, loader: ModuleLoader) -> Self {
        Self {
            path: path.into(),
            loader,
        }
    }
}

/// Declare a test module located in the current source file
///
/// ```ignore
/// fn register(registry: &mut RegistryBuilder) -> anyhow::Result<()> { /* ... */ }
///
/// let module = vouch_runtime::test_module!(register);
/// ```
#[macro_export]
macro_rules! test_module {
    ($loader:expr) => {
        $crate::TestModule::new(file!(), $loader)
    };
}

/// Every test module compiled into the harness
#[derive(Debug, Clone, Default)]
pub struct ModuleTable {
    modules: Vec<TestModule>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, module: TestModule) {
        self.modules.push(module);
    }

    pub fn with(mut self, module: TestModule) -> Self {
        self.add(module);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Modules whose path matches `pattern`, in declaration order
    pub fn matching(&self, pattern: &str) -> Result<Vec<&TestModule>, DiscoveryError> {
        let compiled = Pattern::new(pattern).map_err(|source| DiscoveryError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(self
            .modules
            .iter()
            .filter(|m| path_matches(&compiled, &m.path))
            .collect())
    }
}

fn path_matches(pattern: &Pattern, path: &Path) -> bool {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    // Match on forward slashes whatever the host separator.
    let normalized = path.to_string_lossy().replace('\\', "/");
    pattern.matches_with(&normalized, options)
}

/// Load every module in `table` matching `pattern` into a fresh registry
///
/// The first loader error aborts discovery; no partial registry is returned.
pub fn discover(
    table: &ModuleTable,
    pattern: &str,
    reporter: &mut dyn Reporter,
) -> Result<Registry, DiscoveryError> {
    reporter.discovery_started();

    let modules = table.matching(pattern)?;
    tracing::debug!(pattern, found = modules.len(), "resolved test modules");

    let mut builder = RegistryBuilder::new();
    for module in &modules {
        (module.loader)(&mut builder).map_err(|e| DiscoveryError::Load {
            path: module.path.clone(),
            source: e.into(),
        })?;
    }

    reporter.discovery_finished(modules.len(), builder.suite_count(), builder.test_count());
    Ok(builder.build())
}
