//! Test runner - execute every selected suite and aggregate the results

use crate::error::HookError;
use crate::executor::SuiteExecutor;
use crate::focus::{self, FocusReason};
use crate::hooks::{LifecycleHooks, NoopHooks};
use crate::outcome::{Counts, FailureRecord};
use crate::registry::Registry;
use crate::reporter::{ConsoleReporter, Reporter};
use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use vouch_config::{HookFailurePolicy, RunnerConfig};

/// Outcome of a whole run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub counts: Counts,
    /// Tests in suites left out by run-level focus
    pub focus_skipped: usize,
    /// Wall-clock time of the execution phase only
    pub elapsed: Duration,
    pub started_at: DateTime<Utc>,
    pub failures: Vec<FailureRecord>,
    /// Hook errors absorbed under [`HookFailurePolicy::AbortSuite`]
    pub hook_failures: Vec<String>,
}

impl RunSummary {
    /// True iff nothing failed
    pub fn passed(&self) -> bool {
        self.counts.fail() == 0 && self.hook_failures.is_empty()
    }

    pub fn success_rate(&self) -> f64 {
        self.counts.success_rate()
    }
}

/// Test runner with configuration
pub struct TestRunner {
    policy: HookFailurePolicy,
    hooks: Box<dyn LifecycleHooks>,
    reporter: Box<dyn Reporter>,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new(&RunnerConfig::default())
    }
}

impl TestRunner {
    /// Create a runner printing to the console at the configured verbosity
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            policy: config.hook_failure,
            hooks: Box::new(NoopHooks),
            reporter: Box::new(ConsoleReporter::new(config.verbosity).with_no_color(config.no_color)),
        }
    }

    /// Replace the run-wide lifecycle hooks
    pub fn with_hooks(mut self, hooks: impl LifecycleHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Replace the reporter
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    /// Set how far a hook failure propagates
    pub fn with_hook_failure(mut self, policy: HookFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the registry and report whether every test passed
    pub fn run(&mut self, registry: &Registry) -> Result<bool, HookError> {
        self.execute(registry).map(|summary| summary.passed())
    }

    /// Run the registry and return the full summary
    ///
    /// Counters start from zero on every call.
    pub fn execute(&mut self, registry: &Registry) -> Result<RunSummary, HookError> {
        let mut counts = Counts::new();
        self.reporter.run_started();

        let selection = focus::resolve(registry.suites());
        let focus_skipped = selection.excluded_tests();
        if selection.focus_active {
            for suite in &selection.selected {
                if let Some(reason) = FocusReason::of(suite) {
                    self.reporter.focused_suite(&suite.name, reason);
                }
            }
            counts.add_skipped(focus_skipped);
            tracing::info!(
                suites = selection.selected.len(),
                skipped_tests = focus_skipped,
                "focus active"
            );
        }

        let mut failures = Vec::new();
        let mut hook_failures = Vec::new();

        let started_at = Utc::now();
        let start = Instant::now();
        for suite in &selection.selected {
            let report = SuiteExecutor::new(self.hooks.as_mut(), self.reporter.as_mut(), self.policy)
                .run_suite(suite)?;

            counts += report.counts;
            failures.extend(report.failures);
            hook_failures.extend(report.hook_failures.iter().map(|e| e.to_string()));
        }
        let elapsed = start.elapsed();

        let summary = RunSummary {
            counts,
            focus_skipped: if selection.focus_active { focus_skipped } else { 0 },
            elapsed,
            started_at,
            failures,
            hook_failures,
        };
        tracing::debug!(
            total = summary.counts.total(),
            fail = summary.counts.fail(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "run finished"
        );
        self.reporter.run_finished(&summary);
        Ok(summary)
    }
}
