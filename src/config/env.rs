//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use crate::output::OutputFormat;
use crate::utils::LogLevel;

/// Environment variable prefix
const ENV_PREFIX: &str = "KISS_TEST";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Bail from KISS_TEST_BAIL
    pub bail: Option<bool>,
    /// Output format from KISS_TEST_FORMAT
    pub format: Option<OutputFormat>,
    /// Report file from KISS_TEST_OUTPUT
    pub output: Option<PathBuf>,
    /// Log level from KISS_TEST_LOG
    pub log_level: Option<LogLevel>,
    /// Config file from KISS_TEST_CONFIG
    pub config_file: Option<PathBuf>,
    /// KISS_TEST_NO_COLOR or the conventional NO_COLOR
    pub no_color: bool,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load from an explicit set of variables
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_lookup(|name| vars.get(name).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}"));
        Self {
            bail: get("BAIL").map(|v| parse_bool(&v)),
            format: get("FORMAT").and_then(|v| OutputFormat::from_str(&v)),
            output: get("OUTPUT").map(PathBuf::from),
            log_level: get("LOG").and_then(|v| LogLevel::from_str(&v)),
            config_file: get("CONFIG").map(PathBuf::from),
            no_color: get("NO_COLOR").map(|v| parse_bool(&v)).unwrap_or(false)
                || lookup("NO_COLOR").is_some_and(|v| !v.is_empty()),
        }
    }
}

/// Parse an environment variable as boolean
fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}
