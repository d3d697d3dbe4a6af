//! Suite executor - run one suite's lifecycle
//!
//! ```text
//! Idle -> SettingUp -> Running(per test: Setup -> Exec -> Teardown) -> TearingDown -> Done
//! ```
//!
//! Test bodies are isolated: errors and panics they raise become
//! [`TestOutcome::Fail`] and the next test runs. Hooks are not isolated: a
//! hook error or panic becomes a [`HookError`] that ends the suite, and the
//! [`HookFailurePolicy`] decides whether it also ends the run.

use crate::context::TestContext;
use crate::error::{HookError, HookScope, HookStage};
use crate::focus;
use crate::hooks::LifecycleHooks;
use crate::mock::{self, RestoreOnDrop};
use crate::outcome::{Counts, FailureRecord, TestFailure, TestOutcome};
use crate::registry::{Suite, TestBody, TestEntry};
use crate::reporter::Reporter;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};
use vouch_config::HookFailurePolicy;

/// Result of one suite run
#[derive(Debug, Default)]
pub struct SuiteReport {
    pub counts: Counts,
    pub failures: Vec<FailureRecord>,
    /// Hook errors absorbed under [`HookFailurePolicy::AbortSuite`]
    pub hook_failures: Vec<HookError>,
}

impl SuiteReport {
    fn record(&mut self, suite: &str, test: &str, outcome: TestOutcome) {
        self.counts.record(&outcome);
        if let TestOutcome::Fail(failure) = outcome {
            self.failures.push(FailureRecord {
                suite: suite.to_string(),
                test: test.to_string(),
                failure,
            });
        }
    }
}

/// Runs suites against a set of run-wide hooks and a reporter
pub struct SuiteExecutor<'a> {
    hooks: &'a mut dyn LifecycleHooks,
    reporter: &'a mut dyn Reporter,
    policy: HookFailurePolicy,
}

impl<'a> SuiteExecutor<'a> {
    pub fn new(
        hooks: &'a mut dyn LifecycleHooks,
        reporter: &'a mut dyn Reporter,
        policy: HookFailurePolicy,
    ) -> Self {
        Self {
            hooks,
            reporter,
            policy,
        }
    }

    /// Run every selected test of `suite` with a fresh context
    ///
    /// Under [`HookFailurePolicy::AbortRun`] a hook error is returned as-is.
    /// Under [`HookFailurePolicy::AbortSuite`] it is kept in the report and
    /// every selected, non-skipped test that did not finish is counted as failed.
    pub fn run_suite(&mut self, suite: &Suite) -> Result<SuiteReport, HookError> {
        self.reporter.suite_started(&suite.name);
        tracing::debug!(suite = %suite.name, tests = suite.tests.len(), "suite started");

        let selection = focus::resolve(&suite.tests);
        let mut report = SuiteReport::default();
        report.counts.add_skipped(selection.excluded_count());

        let mut ctx = TestContext::new();
        let mut finished = 0;
        let result = self.run_lifecycle(
            suite,
            &selection.selected,
            &mut ctx,
            &mut report,
            &mut finished,
        );
        // The context lives for exactly one suite run.
        drop(ctx);

        if let Err(err) = result {
            tracing::warn!(suite = %suite.name, error = %err, "suite aborted by hook failure");
            match self.policy {
                HookFailurePolicy::AbortRun => return Err(err),
                HookFailurePolicy::AbortSuite => {
                    let reason = err.to_string();
                    for test in &selection.selected[finished..] {
                        let outcome = if test.skip {
                            TestOutcome::Skip
                        } else {
                            TestOutcome::Fail(TestFailure::SuiteAborted(reason.clone()))
                        };
                        self.reporter
                            .test_finished(&suite.name, &test.name, &outcome, Duration::ZERO);
                        report.record(&suite.name, &test.name, outcome);
                    }
                    report.hook_failures.push(err);
                }
            }
        }

        self.reporter.suite_finished(&suite.name, &report.counts);
        tracing::debug!(
            suite = %suite.name,
            total = report.counts.total(),
            fail = report.counts.fail(),
            "suite finished"
        );
        Ok(report)
    }

    /// SettingUp, Running and TearingDown
    ///
    /// `finished` counts the selected tests that were classified, so the
    /// caller knows which ones an abort left behind.
    fn run_lifecycle(
        &mut self,
        suite: &Suite,
        selected: &[&TestEntry],
        ctx: &mut TestContext,
        report: &mut SuiteReport,
        finished: &mut usize,
    ) -> Result<(), HookError> {
        let name = suite.name.as_str();

        let hooks = &mut *self.hooks;
        guard_hook(name, HookScope::Global, HookStage::BeforeAll, || hooks.before_all(name))?;
        run_suite_hook(suite, HookStage::BeforeAll, ctx)?;

        let running = self.run_tests(suite, selected, ctx, report, finished);

        // Setup succeeded, so teardown runs even if a per-test hook failed.
        let hooks = &mut *self.hooks;
        let teardown = run_suite_hook(suite, HookStage::AfterAll, ctx).and_then(|()| {
            guard_hook(name, HookScope::Global, HookStage::AfterAll, || hooks.after_all(name))
        });

        match (running, teardown) {
            (Err(first), Err(second)) => {
                tracing::warn!(suite = name, error = %second, "teardown failed after an earlier hook failure");
                Err(first)
            }
            (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    fn run_tests(
        &mut self,
        suite: &Suite,
        selected: &[&TestEntry],
        ctx: &mut TestContext,
        report: &mut SuiteReport,
        finished: &mut usize,
    ) -> Result<(), HookError> {
        for test in selected {
            let outcome = self.run_one(suite, test, ctx)?;
            report.record(&suite.name, &test.name, outcome);
            *finished += 1;
        }
        Ok(())
    }

    /// Run a single test through its setup, body and teardown
    ///
    /// The outcome is reported once the teardown hooks have succeeded, so a
    /// test cut short by a hook failure is only reported by the abort path.
    pub fn run_one(
        &mut self,
        suite: &Suite,
        test: &TestEntry,
        ctx: &mut TestContext,
    ) -> Result<TestOutcome, HookError> {
        let name = suite.name.as_str();

        if test.skip {
            let outcome = TestOutcome::Skip;
            self.reporter
                .test_finished(name, &test.name, &outcome, Default::default());
            return Ok(outcome);
        }

        let leftover = mock::restore_all();
        if leftover > 0 {
            tracing::warn!(
                suite = name,
                test = %test.name,
                mocks = leftover,
                "restored mocks registered outside a test"
            );
        }
        // Drains the mock list on every exit path, hook errors included.
        let drain = RestoreOnDrop;

        let test_name = test.name.as_str();
        let hooks = &mut *self.hooks;
        guard_hook(name, HookScope::Global, HookStage::BeforeEach, || {
            hooks.before_each(name, test_name)
        })?;
        run_suite_hook(suite, HookStage::BeforeEach, ctx)?;

        tracing::debug!(suite = name, test = test_name, "running test");
        let started = Instant::now();
        let outcome = execute_body(&test.body, ctx);
        let elapsed = started.elapsed();

        run_suite_hook(suite, HookStage::AfterEach, ctx)?;
        let hooks = &mut *self.hooks;
        guard_hook(name, HookScope::Global, HookStage::AfterEach, || {
            hooks.after_each(name, test_name)
        })?;

        drop(drain);
        self.reporter.test_finished(name, test_name, &outcome, elapsed);
        Ok(outcome)
    }
}

fn run_suite_hook(suite: &Suite, stage: HookStage, ctx: &mut TestContext) -> Result<(), HookError> {
    match suite.hooks.get(stage) {
        Some(hook) => guard_hook(&suite.name, HookScope::Suite, stage, || hook(&mut *ctx)),
        None => Ok(()),
    }
}

/// Call a hook, turning both an error and a panic into a [`HookError`]
fn guard_hook(
    suite: &str,
    scope: HookScope,
    stage: HookStage,
    hook: impl FnOnce() -> anyhow::Result<()>,
) -> Result<(), HookError> {
    let result = match panic::catch_unwind(AssertUnwindSafe(hook)) {
        Ok(result) => result,
        Err(payload) => Err(anyhow::anyhow!("panicked: {}", panic_message(payload.as_ref()))),
    };
    result.map_err(|e| HookError::new(suite, scope, stage, e))
}

/// Invoke a test body and classify what it did
///
/// A context-accepting body that completes normally but changed the context's
/// key set fails with [`TestFailure::ContextContractViolation`].
fn execute_body(body: &TestBody, ctx: &mut TestContext) -> TestOutcome {
    match body {
        TestBody::Plain(f) => classify(panic::catch_unwind(AssertUnwindSafe(|| f()))),
        TestBody::WithContext(f) => {
            let snapshot = ctx.key_snapshot();
            let outcome = classify(panic::catch_unwind(AssertUnwindSafe(|| f(&mut *ctx))));

            match (outcome, snapshot.changes(ctx)) {
                (TestOutcome::Pass, Some(changes)) => TestOutcome::Fail(changes.into()),
                (outcome, _) => outcome,
            }
        }
    }
}

fn classify(result: std::thread::Result<anyhow::Result<()>>) -> TestOutcome {
    match result {
        Ok(Ok(())) => TestOutcome::Pass,
        Ok(Err(err)) => TestOutcome::Fail(TestFailure::Error(format!("{:?}", err))),
        Err(payload) => TestOutcome::Fail(TestFailure::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
