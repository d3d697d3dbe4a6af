//! Vouch test runtime
//!
//! Registers test suites, resolves focus, runs each suite's lifecycle with
//! per-test isolation and aggregates the results.
//!
//! # Example
//!
//! ```
//! use vouch_runtime::{NullReporter, RegistryBuilder, Suite, TestContext, TestEntry, TestRunner};
//!
//! let mut registry = RegistryBuilder::new();
//! registry
//!     .add(
//!         Suite::new("counter")
//!             .before_all(|ctx: &mut TestContext| {
//!                 ctx.insert("count", 0u32);
//!             })
//!             .test(TestEntry::with_context("increments", |ctx: &mut TestContext| {
//!                 *ctx.get_mut::<u32>("count").unwrap() += 1;
//!             }))
//!             .test(TestEntry::new("arithmetic", || assert_eq!(1 + 1, 2))),
//!     )
//!     .unwrap();
//!
//! let mut runner = TestRunner::default().with_reporter(NullReporter);
//! assert!(runner.run(&registry.build()).unwrap());
//! ```

pub mod context;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod focus;
pub mod hooks;
pub mod mock;
pub mod outcome;
pub mod registry;
pub mod reporter;
pub mod runner;

pub use context::TestContext;
pub use discovery::{discover, ModuleLoader, ModuleTable, TestModule};
pub use error::{DiscoveryError, HookError, HookScope, HookStage, RegistryError};
pub use executor::{SuiteExecutor, SuiteReport};
pub use hooks::{LifecycleHooks, NoopHooks};
pub use mock::MockHandle;
pub use outcome::{Counts, FailureRecord, TestFailure, TestOutcome};
pub use registry::{Registry, RegistryBuilder, Suite, SuiteHooks, TestBody, TestEntry};
pub use reporter::{
    ConsoleReporter, FailureReporter, NullReporter, RecordingReporter, ReportEvent, Reporter,
};
pub use runner::{RunSummary, TestRunner};
