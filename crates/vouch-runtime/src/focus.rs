//! Focus resolution
//!
//! The same rule applies to suites within a run and to tests within a suite:
//! when anything at that level is focused, only the focused items execute and
//! the rest are counted as skipped; otherwise everything executes.

use crate::registry::{Suite, TestEntry};

/// Items that can carry a focus marker
pub trait Focusable {
    fn is_focused(&self) -> bool;
}

impl Focusable for TestEntry {
    fn is_focused(&self) -> bool {
        self.focus
    }
}

/// A suite is focused by its own flag or by holding a focused test
impl Focusable for Suite {
    fn is_focused(&self) -> bool {
        self.focus || self.tests.iter().any(|t| t.focus)
    }
}

/// Why a suite made it into a focused run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusReason {
    /// The suite itself is marked focused
    FocusedSuite,
    /// Only some of its tests are marked focused
    ContainsFocusedTests,
}

impl FocusReason {
    pub fn of(suite: &Suite) -> Option<Self> {
        if suite.focus {
            Some(FocusReason::FocusedSuite)
        } else if suite.tests.iter().any(|t| t.focus) {
            Some(FocusReason::ContainsFocusedTests)
        } else {
            None
        }
    }
}

/// Items to execute and items excluded by focus, both in input order
#[derive(Debug)]
pub struct Selection<'a, T> {
    pub selected: Vec<&'a T>,
    pub excluded: Vec<&'a T>,
    /// At least one item was focused
    pub focus_active: bool,
}

/// Split `items` by the focus rule
pub fn resolve<T: Focusable>(items: &[T]) -> Selection<'_, T> {
    let (focused, unfocused): (Vec<&T>, Vec<&T>) = items.iter().partition(|i| i.is_focused());

    if focused.is_empty() {
        Selection {
            selected: unfocused,
            excluded: Vec::new(),
            focus_active: false,
        }
    } else {
        Selection {
            selected: focused,
            excluded: unfocused,
            focus_active: true,
        }
    }
}

impl<T> Selection<'_, T> {
    pub fn excluded_count(&self) -> usize {
        self.excluded.len()
    }
}

impl Selection<'_, Suite> {
    /// Tests inside excluded suites; each counts once as skipped
    pub fn excluded_tests(&self) -> usize {
        self.excluded.iter().map(|s| s.tests.len()).sum()
    }
}
