//! Suite registry
//!
//! Discovery populates a [`RegistryBuilder`]; once every test module is
//! loaded the builder is frozen into a read-only [`Registry`] that the
//! runner executes.

use crate::context::TestContext;
use crate::error::{HookStage, RegistryError};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Values a test body or hook may return
///
/// `()` always succeeds; `Result` fails with its error.
pub trait TestReturn {
    fn into_result(self) -> anyhow::Result<()>;
}

impl TestReturn for () {
    fn into_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<E> TestReturn for Result<(), E>
where
    E: Into<anyhow::Error>,
{
    fn into_result(self) -> anyhow::Result<()> {
        self.map_err(Into::into)
    }
}

/// A lifecycle callback declared by a suite
pub type Hook = Box<dyn Fn(&mut TestContext) -> anyhow::Result<()>>;

/// Callable part of a test
///
/// Whether the test receives the suite context is decided once, when the
/// test is declared.
pub enum TestBody {
    Plain(Box<dyn Fn() -> anyhow::Result<()>>),
    WithContext(Box<dyn Fn(&mut TestContext) -> anyhow::Result<()>>),
}

impl TestBody {
    pub fn accepts_context(&self) -> bool {
        matches!(self, TestBody::WithContext(_))
    }
}

impl fmt::Debug for TestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestBody::Plain(_) => f.write_str("TestBody::Plain"),
            TestBody::WithContext(_) => f.write_str("TestBody::WithContext"),
        }
    }
}

/// A registered test
#[derive(Debug)]
pub struct TestEntry {
    pub name: String,
    pub body: TestBody,
    pub focus: bool,
    pub skip: bool,
}

impl TestEntry {
    /// A test that does not touch the suite context
    pub fn new<F, R>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> R + 'static,
        R: TestReturn,
    {
        Self {
            name: name.into(),
            body: TestBody::Plain(Box::new(move || body().into_result())),
            focus: false,
            skip: false,
        }
    }

    /// A test that reads or updates the suite context
    pub fn with_context<F, R>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut TestContext) -> R + 'static,
        R: TestReturn,
    {
        Self {
            name: name.into(),
            body: TestBody::WithContext(Box::new(move |ctx: &mut TestContext| {
                body(ctx).into_result()
            })),
            focus: false,
            skip: false,
        }
    }

    /// Mark as focused
    pub fn focus(mut self) -> Self {
        self.focus = true;
        self
    }

    /// Mark as skipped
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }
}

/// Optional lifecycle hooks of one suite
#[derive(Default)]
pub struct SuiteHooks {
    pub before_all: Option<Hook>,
    pub after_all: Option<Hook>,
    pub before_each: Option<Hook>,
    pub after_each: Option<Hook>,
}

impl SuiteHooks {
    pub fn get(&self, stage: HookStage) -> Option<&Hook> {
        match stage {
            HookStage::BeforeAll => self.before_all.as_ref(),
            HookStage::AfterAll => self.after_all.as_ref(),
            HookStage::BeforeEach => self.before_each.as_ref(),
            HookStage::AfterEach => self.after_each.as_ref(),
        }
    }

    fn set(&mut self, stage: HookStage, hook: Hook) {
        let slot = match stage {
            HookStage::BeforeAll => &mut self.before_all,
            HookStage::AfterAll => &mut self.after_all,
            HookStage::BeforeEach => &mut self.before_each,
            HookStage::AfterEach => &mut self.after_each,
        };
        *slot = Some(hook);
    }
}

impl fmt::Debug for SuiteHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteHooks")
            .field("before_all", &self.before_all.is_some())
            .field("after_all", &self.after_all.is_some())
            .field("before_each", &self.before_each.is_some())
            .field("after_each", &self.after_each.is_some())
            .finish()
    }
}

/// A registered suite
#[derive(Debug)]
pub struct Suite {
    pub name: String,
    pub hooks: SuiteHooks,
    pub focus: bool,
    pub tests: Vec<TestEntry>,
}

impl Suite {
    /// Start declaring a suite
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hooks: SuiteHooks::default(),
            focus: false,
            tests: Vec::new(),
        }
    }

    pub fn focus(mut self) -> Self {
        self.focus = true;
        self
    }

    pub fn before_all<F, R>(self, hook: F) -> Self
    where
        F: Fn(&mut TestContext) -> R + 'static,
        R: TestReturn,
    {
        self.hook(HookStage::BeforeAll, hook)
    }

    pub fn after_all<F, R>(self, hook: F) -> Self
    where
        F: Fn(&mut TestContext) -> R + 'static,
        R: TestReturn,
    {
        self.hook(HookStage::AfterAll, hook)
    }

    pub fn before_each<F, R>(self, hook: F) -> Self
    where
        F: Fn(&mut TestContext) -> R + 'static,
        R: TestReturn,
    {
        self.hook(HookStage::BeforeEach, hook)
    }

    pub fn after_each<F, R>(self, hook: F) -> Self
    where
        F: Fn(&mut TestContext) -> R + 'static,
        R: TestReturn,
    {
        self.hook(HookStage::AfterEach, hook)
    }

    fn hook<F, R>(mut self, stage: HookStage, hook: F) -> Self
    where
        F: Fn(&mut TestContext) -> R + 'static,
        R: TestReturn,
    {
        self.hooks
            .set(stage, Box::new(move |ctx: &mut TestContext| hook(ctx).into_result()));
        self
    }

    /// Append a test to the declaration
    pub fn test(mut self, test: TestEntry) -> Self {
        self.tests.push(test);
        self
    }
}

/// Mutable registry used while test modules are loading
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    suites: Vec<Suite>,
    index: HashMap<String, usize>,
    test_names: HashMap<String, HashSet<String>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a suite with its hooks
    ///
    /// A name that is already registered is rejected.
    pub fn register_suite(
        &mut self,
        name: impl Into<String>,
        hooks: SuiteHooks,
        focus: bool,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateSuite(name));
        }

        tracing::debug!(suite = %name, focus, "registered suite");
        self.index.insert(name.clone(), self.suites.len());
        self.test_names.insert(name.clone(), HashSet::new());
        self.suites.push(Suite {
            name,
            hooks,
            focus,
            tests: Vec::new(),
        });
        Ok(())
    }

    /// Declare a test inside an already registered suite
    pub fn register_test(&mut self, suite: &str, test: TestEntry) -> Result<(), RegistryError> {
        let Some(&position) = self.index.get(suite) else {
            return Err(RegistryError::UnknownSuite {
                suite: suite.to_string(),
                test: test.name,
            });
        };

        let names = self.test_names.entry(suite.to_string()).or_default();
        if !names.insert(test.name.clone()) {
            return Err(RegistryError::DuplicateTest {
                suite: suite.to_string(),
                test: test.name,
            });
        }

        tracing::debug!(
            suite,
            test = %test.name,
            focus = test.focus,
            skip = test.skip,
            "registered test"
        );
        self.suites[position].tests.push(test);
        Ok(())
    }

    /// Register a suite declared with the [`Suite`] builder, tests included
    pub fn add(&mut self, suite: Suite) -> Result<(), RegistryError> {
        let Suite {
            name,
            hooks,
            focus,
            tests,
        } = suite;

        self.register_suite(name.clone(), hooks, focus)?;
        for test in tests {
            self.register_test(&name, test)?;
        }
        Ok(())
    }

    pub fn suite_count(&self) -> usize {
        self.suites.len()
    }

    pub fn test_count(&self) -> usize {
        self.suites.iter().map(|s| s.tests.len()).sum()
    }

    /// Freeze the registry
    pub fn build(self) -> Registry {
        Registry {
            suites: self.suites,
            index: self.index,
        }
    }
}

/// Read-only set of suites, in registration order
#[derive(Debug, Default)]
pub struct Registry {
    suites: Vec<Suite>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    /// Look up a suite by name
    pub fn get(&self, name: &str) -> Option<&Suite> {
        self.index.get(name).map(|&i| &self.suites[i])
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    pub fn test_count(&self) -> usize {
        self.suites.iter().map(|s| s.tests.len()).sum()
    }

    /// Keep only tests whose `suite::test` path contains `pattern`
    ///
    /// A suite whose name matches keeps all of its tests, even when it has
    /// none. Any other suite left without tests is dropped.
    pub fn filter(self, pattern: &str) -> Self {
        let mut suites = Vec::new();
        let mut index = HashMap::new();

        for mut suite in self.suites {
            let suite_matches = suite.name.contains(pattern);
            if !suite_matches {
                let name = suite.name.clone();
                suite
                    .tests
                    .retain(|t| format!("{}::{}", name, t.name).contains(pattern));
                if suite.tests.is_empty() {
                    continue;
                }
            }

            index.insert(suite.name.clone(), suites.len());
            suites.push(suite);
        }

        Registry { suites, index }
    }
}
