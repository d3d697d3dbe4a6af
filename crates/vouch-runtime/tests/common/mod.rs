//! Shared helpers for vouch-runtime integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use vouch_config::HookFailurePolicy;
use vouch_runtime::{
    HookError, LifecycleHooks, RecordingReporter, RegistryBuilder, RunSummary, TestContext,
    TestRunner,
};

pub use pretty_assertions::assert_eq;

/// Ordered record of everything that happened during a run
#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.0.borrow_mut().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn contains(&self, event: &str) -> bool {
        self.0.borrow().iter().any(|e| e == event)
    }

    /// A suite hook that records `label`
    pub fn hook(&self, label: &str) -> impl Fn(&mut TestContext) + 'static {
        let log = self.clone();
        let label = label.to_string();
        move |_ctx: &mut TestContext| log.push(label.clone())
    }

    /// A plain test body that records `label`
    pub fn body(&self, label: &str) -> impl Fn() + 'static {
        let log = self.clone();
        let label = label.to_string();
        move || log.push(label.clone())
    }
}

/// Run-wide hooks that record into an [`EventLog`]
pub struct RecordingHooks {
    pub log: EventLog,
    /// Make the named stage fail, e.g. `"before_each"`
    pub fail_on: Option<&'static str>,
}

impl RecordingHooks {
    pub fn new(log: &EventLog) -> Self {
        Self {
            log: log.clone(),
            fail_on: None,
        }
    }

    fn record(&self, stage: &'static str, target: &str) -> anyhow::Result<()> {
        self.log.push(format!("global:{}:{}", stage, target));
        if self.fail_on == Some(stage) {
            anyhow::bail!("{} exploded", stage);
        }
        Ok(())
    }
}

impl LifecycleHooks for RecordingHooks {
    fn before_all(&mut self, suite: &str) -> anyhow::Result<()> {
        self.record("before_all", suite)
    }

    fn before_each(&mut self, _suite: &str, test: &str) -> anyhow::Result<()> {
        self.record("before_each", test)
    }

    fn after_each(&mut self, _suite: &str, test: &str) -> anyhow::Result<()> {
        self.record("after_each", test)
    }

    fn after_all(&mut self, suite: &str) -> anyhow::Result<()> {
        self.record("after_all", suite)
    }
}

/// Build and run `builder`, returning the result and the recorded report events
pub fn run_with(
    builder: RegistryBuilder,
    hooks: impl LifecycleHooks + 'static,
    policy: HookFailurePolicy,
) -> (Result<RunSummary, HookError>, RecordingReporter) {
    let recorder = RecordingReporter::new();
    let mut runner = TestRunner::default()
        .with_reporter(recorder.clone())
        .with_hooks(hooks)
        .with_hook_failure(policy);

    let result = runner.execute(&builder.build());
    (result, recorder)
}

/// Run with no-op global hooks under the default policy and unwrap the summary
pub fn run(builder: RegistryBuilder) -> (RunSummary, RecordingReporter) {
    let (result, recorder) = run_with(
        builder,
        vouch_runtime::NoopHooks,
        HookFailurePolicy::AbortRun,
    );
    (result.expect("run should not hit a hook failure"), recorder)
}
