//! Run-level aggregation

mod common;

use common::{assert_eq, run};
use vouch_runtime::{RegistryBuilder, Suite, TestEntry};

fn two_suites() -> RegistryBuilder {
    let mut builder = RegistryBuilder::new();
    builder
        .add(
            Suite::new("parser")
                .test(TestEntry::new("numbers", || {}))
                .test(TestEntry::new::<_, ()>("strings", || panic!("unterminated")))
                .test(TestEntry::new("comments", || {}).skip()),
        )
        .unwrap();
    builder
        .add(
            Suite::new("printer")
                .test(TestEntry::new("numbers", || {}))
                .test(TestEntry::new("indent", || {})),
        )
        .unwrap();
    builder
}

#[test]
fn test_empty_registry_passes() {
    let (summary, recorder) = run(RegistryBuilder::new());

    assert_eq!(summary.counts.as_tuple(), (0, 0, 0, 0));
    assert!(summary.passed());
    assert_eq!(summary.success_rate(), 0.0);
    assert!(recorder.outcomes().is_empty());
}

#[test]
fn test_counts_summed_across_suites() {
    let (summary, _) = run(two_suites());
    let (total, success, fail, skipped) = summary.counts.as_tuple();

    assert_eq!((total, success, fail, skipped), (5, 3, 1, 1));
    assert_eq!(total, success + fail + skipped);
    assert!(!summary.passed());
    assert!((summary.success_rate() - 0.75).abs() < 1e-6);
}

#[test]
fn test_all_skipped_rate_is_zero() {
    let mut builder = RegistryBuilder::new();
    builder
        .add(
            Suite::new("later")
                .test(TestEntry::new("a", || {}).skip())
                .test(TestEntry::new("b", || {}).skip()),
        )
        .unwrap();

    let (summary, _) = run(builder);
    assert_eq!(summary.counts.as_tuple(), (2, 0, 0, 2));
    assert_eq!(summary.success_rate(), 0.0);
    assert!(summary.passed());
}

#[test]
fn test_each_run_starts_from_zero() {
    let registry = two_suites().build();
    let mut runner = vouch_runtime::TestRunner::default().with_reporter(vouch_runtime::NullReporter);

    let first = runner.execute(&registry).unwrap();
    let second = runner.execute(&registry).unwrap();
    assert_eq!(first.counts, second.counts);
}

#[test]
fn test_failures_listed_with_detail() {
    let (summary, _) = run(two_suites());

    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].suite, "parser");
    assert_eq!(summary.failures[0].test, "strings");
    assert_eq!(summary.failures[0].failure.to_string(), "panicked: unterminated");
}

#[test]
fn test_filter_by_test_path() {
    let registry = two_suites().build().filter("::numbers");

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.test_count(), 2);
    assert!(registry.get("parser").is_some());
}

#[test]
fn test_filter_by_suite_name_keeps_whole_suite() {
    let registry = two_suites().build().filter("printer");

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.test_count(), 2);
    assert!(registry.get("parser").is_none());
}

#[test]
fn test_filter_keeps_matching_suite_without_tests() {
    let mut builder = two_suites();
    builder.add(Suite::new("placeholder")).unwrap();

    let registry = builder.build().filter("placeholder");

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.test_count(), 0);
    assert!(registry.get("placeholder").is_some());
}

#[test]
fn test_filter_lookup_follows_new_positions() {
    let registry = two_suites().build().filter("indent");

    assert_eq!(registry.len(), 1);
    let printer = registry.get("printer").unwrap();
    assert_eq!(printer.tests.len(), 1);
    assert_eq!(printer.tests[0].name, "indent");
}
