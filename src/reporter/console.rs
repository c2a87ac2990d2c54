//! Console reporter
//!
//! Prints a header line when a case starts and a status line when it ends.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::{self, Write};

use super::Reporter;
use crate::models::CaseResult;
use crate::output::ResultFormatter;

/// Streams per-case progress to a writer (stdout by default)
pub struct ConsoleReporter<W = io::Stdout> {
    formatter: ResultFormatter,
    out: W,
}

impl ConsoleReporter {
    pub fn stdout(formatter: ResultFormatter) -> Self {
        Self::new(formatter, io::stdout())
    }
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(formatter: ResultFormatter, out: W) -> Self {
        Self { formatter, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{line}").context("Failed to write test progress")?;
        self.out.flush().context("Failed to flush test progress")
    }
}

#[async_trait]
impl<W: Write + Send> Reporter for ConsoleReporter<W> {
    async fn on_test_start(&mut self, case: &CaseResult) -> Result<()> {
        let line = self.formatter.format_case_start(case);
        self.emit(&line)
    }

    async fn on_test_end(&mut self, case: &CaseResult) -> Result<()> {
        let line = self.formatter.format_case_end(case);
        self.emit(&line)
    }
}
