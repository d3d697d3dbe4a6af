//! Test outcomes and run counters

use crate::context::KeyChanges;
use std::ops::AddAssign;
use thiserror::Error;

/// Guards the success-rate division when every test was skipped
pub const SUCCESS_RATE_EPSILON: f64 = 1e-9;

/// Why a test was classified as failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TestFailure {
    /// The body returned an error
    #[error("{0}")]
    Error(String),

    /// The body panicked
    #[error("panicked: {0}")]
    Panic(String),

    /// A context-accepting body added or removed context keys
    #[error(
        "test context keys must not be added or removed inside a test (added: {added:?}, removed: {removed:?})"
    )]
    ContextContractViolation {
        added: Vec<String>,
        removed: Vec<String>,
    },

    /// The suite was abandoned before this test could finish
    #[error("not completed: {0}")]
    SuiteAborted(String),
}

impl From<KeyChanges> for TestFailure {
    fn from(changes: KeyChanges) -> Self {
        TestFailure::ContextContractViolation {
            added: changes.added,
            removed: changes.removed,
        }
    }
}

/// Result of a single test
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Pass,
    Fail(TestFailure),
    Skip,
}

impl TestOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestOutcome::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, TestOutcome::Fail(_))
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, TestOutcome::Skip)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TestOutcome::Pass => "PASS",
            TestOutcome::Fail(_) => "FAIL",
            TestOutcome::Skip => "SKIP",
        }
    }
}

/// `(total, success, fail, skipped)` counters
///
/// Only ever grown by recording outcomes or summing other counters, so
/// `total == success + fail + skipped` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    total: usize,
    success: usize,
    fail: usize,
    skipped: usize,
}

impl Counts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &TestOutcome) {
        self.total += 1;
        match outcome {
            TestOutcome::Pass => self.success += 1,
            TestOutcome::Fail(_) => self.fail += 1,
            TestOutcome::Skip => self.skipped += 1,
        }
    }

    /// Count `n` tests as skipped without running them
    pub fn add_skipped(&mut self, n: usize) {
        self.total += n;
        self.skipped += n;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn success(&self) -> usize {
        self.success
    }

    pub fn fail(&self) -> usize {
        self.fail
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Passed share of the tests that actually ran, in `0.0..=1.0`
    pub fn success_rate(&self) -> f64 {
        let ran = (self.total - self.skipped) as f64;
        self.success as f64 / (ran + SUCCESS_RATE_EPSILON)
    }

    pub fn as_tuple(&self) -> (usize, usize, usize, usize) {
        (self.total, self.success, self.fail, self.skipped)
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, other: Self) {
        self.total += other.total;
        self.success += other.success;
        self.fail += other.fail;
        self.skipped += other.skipped;
    }
}

/// A failed test, for end-of-run reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub suite: String,
    pub test: String,
    pub failure: TestFailure,
}
