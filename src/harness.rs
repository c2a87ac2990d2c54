//! Harness entry point
//!
//! Wires configuration, logging, the console reporter and report export
//! around the runner. Meant for `harness = false` test targets:
//!
//! ```no_run
//! use kiss_test::{harness, Suite, Test, TestNode};
//!
//! fn main() -> std::process::ExitCode {
//!     let suite = Suite::new().module(
//!         "tests/math.rs",
//!         TestNode::map().entry("adds", Test::sync(|| {
//!             anyhow::ensure!(1 + 1 == 2);
//!             Ok(())
//!         })),
//!     );
//!     harness::main(suite)
//! }
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error};

use crate::cli::Args;
use crate::config::{EnvConfig, RunConfig};
use crate::executor::{plan, TestRunner};
use crate::output::ResultFormatter;
use crate::reporter::ConsoleReporter;
use crate::results::{export, ExportFormat, RunReport};
use crate::suite::Suite;
use crate::utils::init_logger;

/// Parse process arguments, run the suite, and map the outcome to an exit code
pub fn main(suite: Suite) -> ExitCode {
    let args = Args::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args, suite)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Resolve configuration (flags > environment > file > defaults) and run
pub async fn run(args: Args, suite: Suite) -> Result<bool> {
    let env = EnvConfig::load();
    let config_path = args.config.clone().or_else(|| env.config_file.clone());
    let config = RunConfig::load_or_default(config_path.as_deref())?.merge_env(&env);
    let config = args.apply(config)?;

    init_logger(config.log_level);
    debug!("Resolved configuration: {:?}", config);

    Harness::new(config)
        .list(args.list)
        .run(suite, &mut io::stdout())
        .await
}

/// Configured harness
#[derive(Clone, Debug, Default)]
pub struct Harness {
    config: RunConfig,
    list: bool,
}

impl Harness {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            list: false,
        }
    }

    /// Only print the planned status of every case
    pub fn list(mut self, list: bool) -> Self {
        self.list = list;
        self
    }

    /// Run the suite, writing progress and the final output to `out`
    ///
    /// Returns whether every executed case passed.
    pub async fn run<W: Write + Send>(&self, suite: Suite, out: &mut W) -> Result<bool> {
        let suite = suite.filter(&self.config.filters);
        let formatter = ResultFormatter::new(self.config.format).with_color(self.config.color);

        if self.list {
            let cases = suite.cases();
            let selections = plan(&cases);
            writeln!(out, "{}", formatter.format_plan(&cases, &selections))
                .context("Failed to write case list")?;
            return Ok(true);
        }

        let started_at = Utc::now();
        let runner = TestRunner::new().bail(self.config.bail);
        let result = if self.config.format.streams_progress() {
            let mut reporter = ConsoleReporter::new(formatter.clone(), &mut *out);
            runner.run_with(&suite, &mut reporter).await?
        } else {
            runner.run(&suite).await?
        };

        let rendered = formatter.format_result(&result)?;
        writeln!(out, "{rendered}").context("Failed to write test results")?;

        if let Some(path) = &self.config.output {
            write_report(path, &RunReport::new(&result, started_at, self.config.bail))?;
        }

        Ok(result.is_success())
    }
}

fn write_report(path: &Path, report: &RunReport<'_>) -> Result<()> {
    let format = ExportFormat::from_extension(path).unwrap_or(ExportFormat::Json);
    export(report, path, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use crate::suite::{Test, TestNode};
    use tempfile::tempdir;

    fn suite() -> Suite {
        Suite::new()
            .module(
                "tests/a.rs",
                TestNode::map()
                    .entry("x", Test::sync(|| anyhow::bail!("Intentional failure"))),
            )
            .module(
                "tests/b.rs",
                TestNode::map().entry("y", Test::async_fn(|| async { Ok(()) })),
            )
    }

    fn plain(format: OutputFormat) -> RunConfig {
        RunConfig {
            format,
            color: false,
            ..RunConfig::default()
        }
    }

    #[tokio::test]
    async fn test_harness_pretty_output() {
        let mut out = Vec::new();
        let ok = Harness::new(plain(OutputFormat::Pretty))
            .run(suite(), &mut out)
            .await
            .unwrap();
        assert!(!ok);

        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("1 tests/a.rs x\nIntentional failure\nFailed | "));
        assert!(output.contains("2 tests/b.rs y\nPassed | "));
        assert!(output.contains("Failures\n1 tests/a.rs x\nIntentional failure\n"));
        assert!(output.contains("1 passed | 0 skipped | 1 failed | "));
    }

    #[tokio::test]
    async fn test_harness_filters_modules() {
        let config = RunConfig {
            filters: vec!["b.rs".to_string()],
            ..plain(OutputFormat::Summary)
        };
        let mut out = Vec::new();
        let ok = Harness::new(config).run(suite(), &mut out).await.unwrap();
        assert!(ok);
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("1 passed | 0 skipped | 0 failed"));
    }

    #[tokio::test]
    async fn test_harness_json_has_no_progress() {
        let mut out = Vec::new();
        Harness::new(plain(OutputFormat::Json))
            .run(suite(), &mut out)
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["passed"][0]["path"], "tests/b.rs");
        assert_eq!(value["failed"][0]["error"], "Intentional failure");
    }

    #[tokio::test]
    async fn test_harness_list_mode() {
        let suite = suite().module(
            "tests/c.rs",
            TestNode::map().entry("later #skip", Test::sync(|| Ok(()))),
        );
        let mut out = Vec::new();
        let ok = Harness::new(plain(OutputFormat::Pretty))
            .list(true)
            .run(suite, &mut out)
            .await
            .unwrap();
        assert!(ok);

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("run tests/a.rs x [sync]"));
        assert!(output.contains("skip tests/c.rs later #skip [sync] skip\n"));
        assert!(output.ends_with("3 cases, 2 selected\n"));
    }

    #[tokio::test]
    async fn test_harness_writes_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        let config = RunConfig {
            output: Some(path.clone()),
            bail: true,
            ..plain(OutputFormat::Summary)
        };

        Harness::new(config).run(suite(), &mut Vec::new()).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["bail"], true);
        assert_eq!(value["skipped"][0]["name"], "y");
    }
}
