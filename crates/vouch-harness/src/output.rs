//! Diagnostic logging and machine-readable output

use chrono::SecondsFormat;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use vouch_runtime::RunSummary;

/// Environment variable holding the `tracing` filter directive
pub const LOG_ENV: &str = "VOUCH_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Install a stderr `tracing` subscriber filtered by `VOUCH_LOG`
///
/// Does nothing if a global subscriber is already set.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// JSON rendering of a finished run
pub fn summary_json(summary: &RunSummary) -> Value {
    let failures: Vec<_> = summary
        .failures
        .iter()
        .map(|record| {
            json!({
                "suite": record.suite,
                "test": record.test,
                "detail": record.failure.to_string(),
            })
        })
        .collect();

    json!({
        "passed": summary.passed(),
        "started_at": summary.started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        "duration_ms": summary.elapsed.as_millis() as u64,
        "tests": summary.counts.total(),
        "success": summary.counts.success(),
        "failed": summary.counts.fail(),
        "skipped": summary.counts.skipped(),
        "focus_skipped": summary.focus_skipped,
        "success_rate": summary.success_rate(),
        "failures": failures,
        "hook_failures": summary.hook_failures,
    })
}
