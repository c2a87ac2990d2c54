//! Results export
//!
//! Writes run reports to disk in JSON or CSV format.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::models::{CaseResult, RunResult};

/// A finished run with identifying metadata
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    /// Unique run ID
    pub id: String,

    /// Timestamp when the run started
    pub started_at: DateTime<Utc>,

    /// Timestamp when the run completed
    pub completed_at: DateTime<Utc>,

    /// Whether the run stopped at the first failure
    pub bail: bool,

    /// Pass rate over executed cases (0.0 - 100.0)
    pub pass_rate: f64,

    /// Tool version
    pub tool_version: &'static str,

    #[serde(flatten)]
    pub result: &'a RunResult,
}

impl<'a> RunReport<'a> {
    pub fn new(result: &'a RunResult, started_at: DateTime<Utc>, bail: bool) -> Self {
        Self {
            id: generate_run_id(started_at),
            started_at,
            completed_at: Utc::now(),
            bail,
            pass_rate: result.pass_rate(),
            tool_version: env!("CARGO_PKG_VERSION"),
            result,
        }
    }
}

/// Generate unique run ID
fn generate_run_id(started_at: DateTime<Utc>) -> String {
    let timestamp = started_at.format("%Y%m%d_%H%M%S");
    let random: u32 = rand::random::<u32>() % 10000;
    format!("{timestamp}_{random:04}")
}

/// Export format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_str)
    }
}

const CSV_HEADER: [&str; 8] = [
    "status", "index", "path", "name", "runs", "duration", "error_kind", "error",
];

fn write_csv<W: Write>(writer: W, run: &RunResult) -> Result<W> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(CSV_HEADER)?;

    let rows = run
        .passed
        .iter()
        .map(|c| ("passed", c))
        .chain(run.failed.iter().map(|c| ("failed", c)))
        .chain(run.skipped.iter().map(|c| ("skipped", c)));

    for (status, case) in rows {
        writer.write_record(csv_row(status, case))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))
}

fn csv_row(status: &str, case: &CaseResult) -> [String; 8] {
    [
        status.to_string(),
        case.index.map(|i| i.to_string()).unwrap_or_default(),
        case.path.clone(),
        case.name.clone(),
        case.durations.len().to_string(),
        case.duration.clone().unwrap_or_default(),
        case.error.as_ref().map(|e| e.kind().to_string()).unwrap_or_default(),
        case.error.as_ref().map(|e| e.to_string()).unwrap_or_default(),
    ]
}

/// Render a run as CSV, one row per case
pub fn to_csv(run: &RunResult) -> Result<String> {
    let bytes = write_csv(Vec::new(), run)?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Export a report to a file
pub fn export(report: &RunReport<'_>, path: &Path, format: ExportFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create results file: {}", path.display()))?;
    let writer = BufWriter::new(file);

    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(writer, report).context("Failed to write results")?;
        }
        ExportFormat::Csv => {
            write_csv(writer, report.result)?
                .flush()
                .context("Failed to write results")?;
        }
    }

    info!("Exported results to {}", path.display());
    Ok(())
}
