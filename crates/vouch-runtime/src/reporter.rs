//! Test reporter - display run progress and results

use crate::focus::FocusReason;
use crate::outcome::{Counts, TestFailure, TestOutcome};
use crate::runner::RunSummary;
use colored::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use vouch_config::Verbosity;

/// Receives run events as they happen
///
/// Every method defaults to doing nothing.
pub trait Reporter {
    fn discovery_started(&mut self) {}

    fn discovery_finished(&mut self, _files: usize, _suites: usize, _tests: usize) {}

    fn run_started(&mut self) {}

    fn focused_suite(&mut self, _suite: &str, _reason: FocusReason) {}

    fn suite_started(&mut self, _suite: &str) {}

    fn test_finished(
        &mut self,
        _suite: &str,
        _test: &str,
        _outcome: &TestOutcome,
        _elapsed: Duration,
    ) {
    }

    fn suite_finished(&mut self, _suite: &str, _counts: &Counts) {}

    fn run_finished(&mut self, _summary: &RunSummary) {}
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Prints to the console according to the configured verbosity
pub struct ConsoleReporter {
    verbosity: Verbosity,
    no_color: bool,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(Verbosity::default())
    }
}

impl ConsoleReporter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            no_color: false,
        }
    }

    /// Disable colored output
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        if no_color {
            colored::control::set_override(false);
        }
        self
    }

    fn verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    fn quiet(&self) -> bool {
        self.verbosity == Verbosity::Summary
    }
}

/// Stderr block for one failed test: a `suite::test` header, then the
/// indented failure text
pub fn failure_detail(suite: &str, test: &str, failure: &TestFailure) -> String {
    let mut out = format!("  {} {}::{}\n", "●".red(), suite, test.bold());
    for line in failure.to_string().lines() {
        out.push_str(&format!("      {}\n", line.dimmed()));
    }
    out
}

/// `"12 Total, 10 Pass, 1 Fail, 1 Skipped. (90.91%)"`
pub fn counts_line(counts: &Counts) -> String {
    format!(
        "{} Total, {} Pass, {} Fail, {} Skipped. ({:.2}%)",
        counts.total(),
        counts.success(),
        counts.fail(),
        counts.skipped(),
        counts.success_rate() * 100.0
    )
}

impl Reporter for ConsoleReporter {
    fn discovery_started(&mut self) {
        if self.verbose() {
            println!("Scanning for tests");
        }
    }

    fn discovery_finished(&mut self, files: usize, suites: usize, tests: usize) {
        if self.verbose() {
            println!("Found {} test files", files);
            println!("Loaded {} test suites with {} tests", suites, tests);
        }
    }

    fn run_started(&mut self) {
        println!("{}", "Starting tests".bold());
        if !self.quiet() {
            println!();
        }
    }

    fn focused_suite(&mut self, suite: &str, reason: FocusReason) {
        let message = match reason {
            FocusReason::FocusedSuite => format!("!!! {} is a focused test suite", suite),
            FocusReason::ContainsFocusedTests => format!("!!! {} contains focused tests", suite),
        };
        println!("{}", message.yellow().bold());
    }

    fn suite_started(&mut self, suite: &str) {
        if !self.quiet() {
            println!("Starting: {}", suite.bold());
        }
    }

    fn test_finished(&mut self, suite: &str, test: &str, outcome: &TestOutcome, elapsed: Duration) {
        if self.verbose() {
            let label = match outcome {
                TestOutcome::Pass => outcome.label().green().bold(),
                TestOutcome::Fail(_) => outcome.label().red().bold(),
                TestOutcome::Skip => outcome.label().yellow().bold(),
            };
            if outcome.is_skip() {
                println!("  {} {}", test, label);
            } else {
                println!("  {} {} ({:.2?})", test, label, elapsed);
            }
        }

        // Failure detail is printed the moment it is known, at every verbosity.
        if let TestOutcome::Fail(failure) = outcome {
            eprint!("{}", failure_detail(suite, test, failure));
        }
    }

    fn suite_finished(&mut self, _suite: &str, counts: &Counts) {
        if !self.quiet() {
            println!("{}", counts_line(counts));
        }
        if self.verbose() {
            println!();
        }
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        if !self.verbose() {
            println!();
        }

        println!("{}", "─".repeat(50));
        let status = if summary.passed() {
            "PASSED".green().bold()
        } else {
            "FAILED".red().bold()
        };
        println!("Tests complete: {}", status);
        println!("{}", counts_line(&summary.counts));
        println!("Took {:.2?}", summary.elapsed);

        if !summary.failures.is_empty() {
            println!();
            println!("{}", "Failures:".red().bold());
            for record in &summary.failures {
                println!("  {} {}::{}", "●".red(), record.suite, record.test.bold());
            }
        }

        if !summary.hook_failures.is_empty() {
            println!();
            println!("{}", "Hook failures:".red().bold());
            for message in &summary.hook_failures {
                println!("  {} {}", "●".red(), message);
            }
        }

        if self.no_color {
            colored::control::unset_override();
        }
    }
}

/// Prints failure detail to stderr and nothing else
///
/// For runs whose stdout is reserved for machine-readable output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailureReporter;

impl Reporter for FailureReporter {
    fn test_finished(&mut self, suite: &str, test: &str, outcome: &TestOutcome, _elapsed: Duration) {
        if let TestOutcome::Fail(failure) = outcome {
            eprint!("{}", failure_detail(suite, test, failure));
        }
    }
}

/// Events captured by [`RecordingReporter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    DiscoveryFinished {
        files: usize,
        suites: usize,
        tests: usize,
    },
    RunStarted,
    FocusedSuite(String, FocusReason),
    SuiteStarted(String),
    TestFinished {
        suite: String,
        test: String,
        outcome: TestOutcome,
    },
    SuiteFinished(String, Counts),
    RunFinished(Counts),
}

/// Keeps every event in memory; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    events: Rc<RefCell<Vec<ReportEvent>>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.borrow().clone()
    }

    /// Outcomes of finished tests as `(suite, test, outcome)`
    pub fn outcomes(&self) -> Vec<(String, String, TestOutcome)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ReportEvent::TestFinished {
                    suite,
                    test,
                    outcome,
                } => Some((suite.clone(), test.clone(), outcome.clone())),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ReportEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn discovery_finished(&mut self, files: usize, suites: usize, tests: usize) {
        self.push(ReportEvent::DiscoveryFinished {
            files,
            suites,
            tests,
        });
    }

    fn run_started(&mut self) {
        self.push(ReportEvent::RunStarted);
    }

    fn focused_suite(&mut self, suite: &str, reason: FocusReason) {
        self.push(ReportEvent::FocusedSuite(suite.to_string(), reason));
    }

    fn suite_started(&mut self, suite: &str) {
        self.push(ReportEvent::SuiteStarted(suite.to_string()));
    }

    fn test_finished(&mut self, suite: &str, test: &str, outcome: &TestOutcome, _elapsed: Duration) {
        self.push(ReportEvent::TestFinished {
            suite: suite.to_string(),
            test: test.to_string(),
            outcome: outcome.clone(),
        });
    }

    fn suite_finished(&mut self, suite: &str, counts: &Counts) {
        self.push(ReportEvent::SuiteFinished(suite.to_string(), *counts));
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        self.push(ReportEvent::RunFinished(summary.counts));
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn discovery_started(&mut self) {
        (**self).discovery_started()
    }

    fn discovery_finished(&mut self, files: usize, suites: usize, tests: usize) {
        (**self).discovery_finished(files, suites, tests)
    }

    fn run_started(&mut self) {
        (**self).run_started()
    }

    fn focused_suite(&mut self, suite: &str, reason: FocusReason) {
        (**self).focused_suite(suite, reason)
    }

    fn suite_started(&mut self, suite: &str) {
        (**self).suite_started(suite)
    }

    fn test_finished(&mut self, suite: &str, test: &str, outcome: &TestOutcome, elapsed: Duration) {
        (**self).test_finished(suite, test, outcome, elapsed)
    }

    fn suite_finished(&mut self, suite: &str, counts: &Counts) {
        (**self).suite_finished(suite, counts)
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        (**self).run_finished(summary)
    }
}
