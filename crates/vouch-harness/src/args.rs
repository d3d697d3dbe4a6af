//! Command line arguments
//!
//! Flags override values from `vouch.toml` and `VOUCH_*` environment
//! variables. A handful of hidden flags exist only so the binary can be
//! invoked by `cargo test` without tripping over libtest options.

use clap::Parser;
use std::path::PathBuf;
use vouch_config::{ConfigResult, HookFailurePolicy, RunnerConfig, Verbosity};

/// Run the vouch test suites compiled into this binary.
///
/// EXAMPLES:
///     cargo test --test suites                       Run everything
///     cargo test --test suites -- math               Only tests matching "math"
///     cargo test --test suites -- --verbosity=verbose --abort-suite
///
/// ENVIRONMENT VARIABLES:
///     VOUCH_FILE_GLOB     Test module selection glob
///     VOUCH_VERBOSITY     SUMMARY, INFO or VERBOSE
///     VOUCH_HOOK_FAILURE  abort-run or abort-suite
///     VOUCH_LOG           Diagnostic log filter (default: warn)
///     NO_COLOR            Set to disable colored output
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "vouch")]
#[command(version)]
pub struct Args {
    /// Only run tests whose `suite::test` path contains this text
    pub filter: Option<String>,

    /// Glob selecting test modules by source path
    #[arg(long, value_name = "GLOB")]
    pub file_glob: Option<String>,

    /// Output level: SUMMARY, INFO or VERBOSE
    #[arg(long, value_name = "LEVEL")]
    pub verbosity: Option<Verbosity>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Print the run summary as JSON instead of console output
    #[arg(long, env = "VOUCH_JSON")]
    pub json: bool,

    /// Keep running other suites when a lifecycle hook fails
    #[arg(long)]
    pub abort_suite: bool,

    /// Path to a configuration file (default: search upward for vouch.toml)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Same as --verbosity=summary
    #[arg(long, short = 'q', hide = true)]
    pub quiet: bool,

    #[arg(long, hide = true)]
    pub nocapture: bool,

    #[arg(long, hide = true, value_name = "N")]
    pub test_threads: Option<usize>,

    #[arg(long, hide = true)]
    pub exact: bool,
}

impl Args {
    /// Overlay command line flags on a loaded configuration
    pub fn apply(&self, mut config: RunnerConfig) -> ConfigResult<RunnerConfig> {
        if let Some(glob) = &self.file_glob {
            config.file_glob = glob.clone();
        }

        if let Some(verbosity) = self.verbosity {
            config.verbosity = verbosity;
        } else if self.quiet {
            config.verbosity = Verbosity::Summary;
        }

        if self.no_color {
            config.no_color = true;
        }

        if self.abort_suite {
            config.hook_failure = HookFailurePolicy::AbortSuite;
        }

        if self.test_threads.is_some_and(|n| n > 1) {
            tracing::debug!("suites run sequentially; ignoring --test-threads");
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("vouch").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let config = RunnerConfig::with_glob("suites/*.rs");
        let applied = parse(&[]).apply(config.clone()).unwrap();
        assert_eq!(applied, config);
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse(&[
            "--file-glob",
            "tests/**/*_spec.rs",
            "--verbosity",
            "verbose",
            "--no-color",
            "--abort-suite",
        ]);

        let config = args.apply(RunnerConfig::default()).unwrap();
        assert_eq!(config.file_glob, "tests/**/*_spec.rs");
        assert_eq!(config.verbosity, Verbosity::Verbose);
        assert!(config.no_color);
        assert_eq!(config.hook_failure, HookFailurePolicy::AbortSuite);
    }

    #[rstest]
    #[case(&["-q"], Verbosity::Summary)]
    #[case(&["--quiet", "--verbosity=INFO"], Verbosity::Info)]
    #[case(&[], Verbosity::Info)]
    fn test_quiet_flag(#[case] flags: &[&str], #[case] expected: Verbosity) {
        let config = parse(flags).apply(RunnerConfig::default()).unwrap();
        assert_eq!(config.verbosity, expected);
    }

    #[test]
    fn test_positional_filter() {
        let args = parse(&["math::adds", "--nocapture", "--test-threads=1"]);
        assert_eq!(args.filter.as_deref(), Some("math::adds"));
        assert!(args.nocapture);
        assert_eq!(args.test_threads, Some(1));
    }

    #[test]
    fn test_invalid_verbosity_rejected() {
        let result = Args::try_parse_from(["vouch", "--verbosity", "loud"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_glob_rejected() {
        let args = parse(&["--file-glob", ""]);
        assert!(args.apply(RunnerConfig::default()).is_err());
    }
}
