//! CLI argument parsing
//!
//! Defines the harness command-line interface using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::RunConfig;
use crate::output::OutputFormat;
use crate::utils::LogLevel;

/// Run the registered test modules
#[derive(Parser, Debug, Default)]
#[command(name = "kiss-test")]
#[command(version)]
#[command(about = "Run test modules sequentially with tag directives")]
#[command(long_about = None)]
pub struct Args {
    /// Only run modules whose path contains one of these filters
    pub filters: Vec<String>,

    /// Skip every remaining case after the first failure
    #[arg(long)]
    pub bail: bool,

    /// Output format (pretty, summary, json, json-pretty, csv)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Write the run report to this file (.json or .csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Config file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level for diagnostics (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// List cases with their planned status without running them
    #[arg(short, long)]
    pub list: bool,

    #[command(flatten)]
    pub libtest: LibtestArgs,
}

/// Flags cargo forwards to every test binary; accepted and ignored
#[derive(clap::Args, Debug, Default)]
pub struct LibtestArgs {
    #[arg(long, hide = true)]
    pub nocapture: bool,

    #[arg(long, hide = true)]
    pub show_output: bool,

    #[arg(long, hide = true)]
    pub test_threads: Option<usize>,

    #[arg(short, long, hide = true)]
    pub quiet: bool,

    #[arg(long, hide = true)]
    pub exact: bool,

    #[arg(long, hide = true)]
    pub ignored: bool,

    #[arg(long, hide = true)]
    pub include_ignored: bool,
}

impl Args {
    /// Apply flags on top of a loaded configuration
    pub fn apply(&self, mut config: RunConfig) -> anyhow::Result<RunConfig> {
        if self.bail {
            config.bail = true;
        }
        if let Some(format) = &self.format {
            config.format = OutputFormat::from_str(format)
                .ok_or_else(|| anyhow::anyhow!("Unknown output format: {format}"))?;
        }
        if let Some(output) = &self.output {
            config.output = Some(output.clone());
        }
        if self.no_color {
            config.color = false;
        }
        if let Some(level) = &self.log_level {
            config.log_level = LogLevel::from_str(level)
                .ok_or_else(|| anyhow::anyhow!("Unknown log level: {level}"))?;
        }
        if !self.filters.is_empty() {
            config.filters = self.filters.clone();
        }

        config.validate()?;
        Ok(config)
    }
}
