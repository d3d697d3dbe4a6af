//! Vouch harness - entry point for test binaries
//!
//! A test binary declares its modules, hands them to a [`Harness`] and
//! returns the resulting exit code:
//!
//! ```no_run
//! use std::process::ExitCode;
//! use vouch_harness::Harness;
//! use vouch_runtime::{test_module, RegistryBuilder, Suite, TestEntry};
//!
//! fn register(registry: &mut RegistryBuilder) -> anyhow::Result<()> {
//!     registry.add(Suite::new("math").test(TestEntry::new("adds", || assert_eq!(2 + 2, 4))))?;
//!     Ok(())
//! }
//!
//! fn main() -> ExitCode {
//!     Harness::new().module(test_module!(register)).run()
//! }
//! ```
//!
//! Exit codes: `0` when every test passed, `1` when a test or hook failed,
//! `2` when the run could not happen (bad configuration, discovery error or
//! a hook failure that aborted the run).

mod args;
mod output;

pub use args::Args;
pub use output::{init_logging, summary_json, LOG_ENV};

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::process::ExitCode;
use vouch_config::{ConfigLoader, RunnerConfig};
use vouch_runtime::{
    discover, ConsoleReporter, FailureReporter, LifecycleHooks, ModuleTable, NoopHooks, Reporter,
    TestModule, TestRunner,
};

/// Exit code for a run that could not complete
const EXIT_ERROR: u8 = 2;

/// Test modules plus run-wide hooks, ready to run
pub struct Harness {
    modules: ModuleTable,
    hooks: Box<dyn LifecycleHooks>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        Self {
            modules: ModuleTable::new(),
            hooks: Box::new(NoopHooks),
        }
    }

    /// Declare a test module, usually via [`vouch_runtime::test_module!`]
    pub fn module(mut self, module: TestModule) -> Self {
        self.modules.add(module);
        self
    }

    /// Install run-wide lifecycle hooks
    pub fn hooks(mut self, hooks: impl LifecycleHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Parse process arguments, run, and map the outcome to an exit code
    pub fn run(self) -> ExitCode {
        let args = Args::parse();
        init_logging();

        match self.run_with_args(&args) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(err) => {
                eprintln!("{} {:#}", "error:".red().bold(), err);
                ExitCode::from(EXIT_ERROR)
            }
        }
    }

    /// Load configuration, apply `args` on top and run
    pub fn run_with_args(self, args: &Args) -> Result<bool> {
        let config = load_config(args)?;
        self.run_with_config(&config, args.filter.as_deref(), args.json)
    }

    /// Discover, run and report with an already resolved configuration
    ///
    /// Returns whether every test passed.
    pub fn run_with_config(
        self,
        config: &RunnerConfig,
        filter: Option<&str>,
        json: bool,
    ) -> Result<bool> {
        let mut discovery_reporter = reporter_for(config, json);
        let mut registry = discover(&self.modules, &config.file_glob, discovery_reporter.as_mut())
            .context("test discovery failed")?;

        if registry.is_empty() {
            tracing::warn!(glob = %config.file_glob, "no test suites matched");
        }

        if let Some(pattern) = filter {
            registry = registry.filter(pattern);
            tracing::debug!(pattern, suites = registry.len(), "applied name filter");
        }

        let mut runner = TestRunner::new(config)
            .with_hooks(self.hooks)
            .with_reporter(reporter_for(config, json));
        let summary = runner.execute(&registry)?;

        if json {
            println!("{}", summary_json(&summary));
        }

        Ok(summary.passed())
    }
}

/// Resolve configuration: config file, then environment, then flags
fn load_config(args: &Args) -> Result<RunnerConfig> {
    let loader = ConfigLoader::new();
    let loaded = match &args.config {
        Some(path) => loader
            .load_from_file(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            loader.load_from_directory(&cwd)?
        }
    };

    if let Some(root) = loaded.project_root() {
        tracing::debug!(root = %root.display(), "using project configuration");
    }

    Ok(args.apply(loaded.runner)?)
}

/// Console output, or failure detail on stderr only when stdout carries JSON
fn reporter_for(config: &RunnerConfig, json: bool) -> Box<dyn Reporter> {
    if json {
        Box::new(FailureReporter)
    } else {
        Box::new(ConsoleReporter::new(config.verbosity).with_no_color(config.no_color))
    }
}
