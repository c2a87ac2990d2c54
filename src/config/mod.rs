//! Configuration module
//!
//! Handles loading run configuration from a file, environment variables
//! and command-line flags.

mod env;

pub use env::EnvConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;
use crate::utils::LogLevel;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./kiss-test.yaml",
    "./kiss-test.yml",
    "./.kiss-test.yaml",
    "~/.config/kiss-test/config.yaml",
];

/// Run configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Stop running after the first failure
    pub bail: bool,

    /// Final output format
    pub format: OutputFormat,

    /// Colorize console output
    pub color: bool,

    /// Diagnostic log level
    pub log_level: LogLevel,

    /// Report file (JSON, or CSV by extension)
    pub output: Option<PathBuf>,

    /// Module path filters
    pub filters: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            bail: false,
            format: OutputFormat::Pretty,
            color: true,
            log_level: LogLevel::Warn,
            output: None,
            filters: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load from the given path, the first standard location, or defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path.map(Path::to_path_buf).or_else(Self::find) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.filters.iter().any(|f| f.is_empty()) {
            anyhow::bail!("Module filters must not be empty strings");
        }

        if let Some(output) = &self.output {
            if output.extension().is_none() {
                anyhow::bail!(
                    "Report file {} needs a .json or .csv extension",
                    output.display()
                );
            }
        }

        Ok(())
    }

    /// Apply environment overrides on top of this configuration
    pub fn merge_env(mut self, env: &EnvConfig) -> Self {
        if let Some(bail) = env.bail {
            self.bail = bail;
        }
        if let Some(format) = env.format {
            self.format = format;
        }
        if let Some(log_level) = env.log_level {
            self.log_level = log_level;
        }
        if let Some(output) = &env.output {
            self.output = Some(output.clone());
        }
        if env.no_color {
            self.color = false;
        }
        self
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
