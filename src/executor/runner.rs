//! Test execution runner
//!
//! Runs the scheduled cases one at a time, applying bail and repeat
//! semantics, and aggregates the outcomes.

use tracing::{debug, info, warn};

use super::invoke::invoke;
use super::scheduler::{schedule, Schedule, Scheduled};
use crate::models::{CaseResult, HookKind, RunError, RunResult};
use crate::reporter::{NoopReporter, Reporter};
use crate::suite::Suite;
use crate::utils::{format_secs, Stopwatch, Timer};

/// Sequential test runner
#[derive(Clone, Copy, Debug, Default)]
pub struct TestRunner {
    bail: bool,
}

impl TestRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip every remaining case after the first failure
    pub fn bail(mut self, bail: bool) -> Self {
        self.bail = bail;
        self
    }

    /// Run a suite without reporting hooks
    pub async fn run(&self, suite: &Suite) -> Result<RunResult, RunError> {
        self.run_with(suite, &mut NoopReporter).await
    }

    /// Run a suite, awaiting the reporter's hooks around every executed case
    ///
    /// Case failures are recorded on the result; only malformed suites and
    /// hook errors are returned as `Err`.
    pub async fn run_with(
        &self,
        suite: &Suite,
        reporter: &mut dyn Reporter,
    ) -> Result<RunResult, RunError> {
        suite.validate()?;

        let mut ctx = RunContext::new();
        let Schedule { run_list, skipped } = schedule(suite.cases());
        ctx.skipped = skipped;

        info!(
            "Running {} of {} cases from {} modules",
            run_list.len(),
            run_list.len() + ctx.skipped.len(),
            suite.len()
        );

        for scheduled in run_list {
            if self.bail && !ctx.failed.is_empty() {
                debug!("Bailing out, skipping {}", scheduled.result);
                ctx.skipped.push(scheduled.result);
                continue;
            }
            ctx.execute(scheduled, reporter).await?;
        }

        let result = ctx.finish();
        info!("Run completed: {}", result);
        Ok(result)
    }
}

/// Mutable state of a single run
///
/// Built fresh per run; owned by the run loop and never exposed to tests.
struct RunContext {
    timer: Timer,
    passed: Vec<CaseResult>,
    failed: Vec<CaseResult>,
    skipped: Vec<CaseResult>,
}

impl RunContext {
    fn new() -> Self {
        Self {
            timer: Timer::start("run"),
            passed: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    async fn execute(
        &mut self,
        scheduled: Scheduled,
        reporter: &mut dyn Reporter,
    ) -> Result<(), RunError> {
        let Scheduled {
            test,
            times,
            mut result,
        } = scheduled;

        reporter
            .on_test_start(&result)
            .await
            .map_err(|source| hook_error(HookKind::TestStart, &result, source))?;

        debug!("Running {} ({}, x{})", result, test.func().kind(), times);
        let mut stopwatch = Stopwatch::new();
        for iteration in 1..=times {
            if let Err(error) = invoke(test.func()).await {
                warn!("{} failed on iteration {}: {}", result, iteration, error);
                result.error = Some(error);
                break;
            }
            stopwatch.lap();
        }
        result.durations = stopwatch.lap_times();
        result.duration = Some(format_secs(stopwatch.total()));

        reporter
            .on_test_end(&result)
            .await
            .map_err(|source| hook_error(HookKind::TestEnd, &result, source))?;

        if result.is_failed() {
            self.failed.push(result);
        } else {
            self.passed.push(result);
        }
        Ok(())
    }

    fn finish(self) -> RunResult {
        RunResult {
            duration: format_secs(self.timer.stop()),
            passed: self.passed,
            failed: self.failed,
            skipped: self.skipped,
        }
    }
}

fn hook_error(hook: HookKind, case: &CaseResult, source: anyhow::Error) -> RunError {
    RunError::Hook {
        hook,
        path: case.path.clone(),
        name: case.name.clone(),
        source,
    }
}
