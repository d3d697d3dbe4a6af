//! Focus resolution across runs and suites

mod common;

use common::{assert_eq, run, EventLog};
use vouch_runtime::focus::FocusReason;
use vouch_runtime::{RegistryBuilder, ReportEvent, Suite, TestEntry, TestOutcome};

// ============================================================================
// Suite-level focus
// ============================================================================

#[test]
fn test_focused_test_excludes_siblings() {
    let log = EventLog::new();
    let mut builder = RegistryBuilder::new();
    builder
        .add(
            Suite::new("s")
                .before_each(log.hook("before_each"))
                .test(TestEntry::new("t1", log.body("t1")))
                .test(TestEntry::new("t2", log.body("t2")).skip())
                .test(TestEntry::new("t3", log.body("t3")).focus()),
        )
        .unwrap();

    let (summary, recorder) = run(builder);

    assert_eq!(summary.counts.as_tuple(), (3, 1, 0, 2));
    assert_eq!(log.events(), vec!["before_each", "t3"]);
    assert_eq!(
        recorder.outcomes(),
        vec![("s".to_string(), "t3".to_string(), TestOutcome::Pass)]
    );
}

#[test]
fn test_focused_failing_test_counts_as_fail() {
    let mut builder = RegistryBuilder::new();
    builder
        .add(
            Suite::new("s")
                .test(TestEntry::new("t1", || {}))
                .test(TestEntry::new("t2", || {}).skip())
                .test(TestEntry::new::<_, ()>("t3", || panic!("focused and broken")).focus()),
        )
        .unwrap();

    let (summary, _) = run(builder);
    assert_eq!(summary.counts.as_tuple(), (3, 0, 1, 2));
    assert!(!summary.passed());
}

#[test]
fn test_skip_dominates_focus() {
    let log = EventLog::new();
    let mut builder = RegistryBuilder::new();
    builder
        .add(
            Suite::new("s")
                .before_each(log.hook("before_each"))
                .after_each(log.hook("after_each"))
                .test(TestEntry::new("t", log.body("t")).focus().skip()),
        )
        .unwrap();

    let (summary, _) = run(builder);
    assert_eq!(summary.counts.as_tuple(), (1, 0, 0, 1));
    assert!(log.events().is_empty());
}

// ============================================================================
// Run-level focus
// ============================================================================

#[test]
fn test_focused_suite_runs_all_its_tests() {
    let mut builder = RegistryBuilder::new();
    builder
        .add(
            Suite::new("focused")
                .focus()
                .test(TestEntry::new("a", || {}))
                .test(TestEntry::new("b", || {})),
        )
        .unwrap();
    builder
        .add(Suite::new("other").test(TestEntry::new("c", || {})))
        .unwrap();

    let (summary, recorder) = run(builder);

    assert_eq!(summary.counts.as_tuple(), (3, 2, 0, 1));
    assert_eq!(summary.focus_skipped, 1);
    let ran: Vec<_> = recorder.outcomes().into_iter().map(|(_, t, _)| t).collect();
    assert_eq!(ran, vec!["a", "b"]);
}

#[test]
fn test_excluded_suites_fire_no_hooks() {
    let log = EventLog::new();
    let mut builder = RegistryBuilder::new();
    builder
        .add(
            Suite::new("excluded")
                .before_all(log.hook("excluded:before_all"))
                .after_all(log.hook("excluded:after_all"))
                .test(TestEntry::new("x", log.body("x")))
                .test(TestEntry::new("y", log.body("y"))),
        )
        .unwrap();
    builder
        .add(
            Suite::new("chosen")
                .before_all(log.hook("chosen:before_all"))
                .test(TestEntry::new("z", log.body("z")).focus()),
        )
        .unwrap();

    let (summary, recorder) = run(builder);

    assert_eq!(summary.counts.as_tuple(), (3, 1, 0, 2));
    assert_eq!(log.events(), vec!["chosen:before_all", "z"]);
    assert!(!recorder
        .events()
        .contains(&ReportEvent::SuiteStarted("excluded".to_string())));
}

#[test]
fn test_focus_reasons_reported() {
    let mut builder = RegistryBuilder::new();
    builder
        .add(Suite::new("flagged").focus().test(TestEntry::new("a", || {})))
        .unwrap();
    builder
        .add(Suite::new("inner").test(TestEntry::new("b", || {}).focus()))
        .unwrap();
    builder
        .add(Suite::new("plain").test(TestEntry::new("c", || {})))
        .unwrap();

    let (_, recorder) = run(builder);
    let focused: Vec<_> = recorder
        .events()
        .into_iter()
        .filter_map(|e| match e {
            ReportEvent::FocusedSuite(name, reason) => Some((name, reason)),
            _ => None,
        })
        .collect();

    assert_eq!(
        focused,
        vec![
            ("flagged".to_string(), FocusReason::FocusedSuite),
            ("inner".to_string(), FocusReason::ContainsFocusedTests),
        ]
    );
}

#[test]
fn test_focus_counts_every_test_once() {
    let mut builder = RegistryBuilder::new();
    builder
        .add(
            Suite::new("one")
                .test(TestEntry::new("a", || {}))
                .test(TestEntry::new("b", || {}).focus())
                .test(TestEntry::new("c", || {}).skip()),
        )
        .unwrap();
    builder
        .add(
            Suite::new("two")
                .test(TestEntry::new("d", || {}))
                .test(TestEntry::new("e", || {}).skip()),
        )
        .unwrap();

    let (summary, _) = run(builder);
    let (total, success, fail, skipped) = summary.counts.as_tuple();

    assert_eq!(total, 5);
    assert_eq!(total, success + fail + skipped);
    assert_eq!((success, skipped), (1, 4));
}

#[test]
fn test_no_focus_is_ordinary_run() {
    let mut builder = RegistryBuilder::new();
    builder
        .add(Suite::new("a").test(TestEntry::new("x", || {})))
        .unwrap();
    builder
        .add(Suite::new("b").test(TestEntry::new("y", || {}).skip()))
        .unwrap();

    let (summary, recorder) = run(builder);
    assert_eq!(summary.counts.as_tuple(), (2, 1, 0, 1));
    assert_eq!(summary.focus_skipped, 0);
    assert!(!recorder
        .events()
        .iter()
        .any(|e| matches!(e, ReportEvent::FocusedSuite(..))));
}
