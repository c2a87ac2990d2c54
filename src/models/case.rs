//! Case and run result models
//!
//! Defines case identities, per-case results, and the run summary.

use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Duration;

use super::CaseError;

/// Identity of a case: module path plus qualified name
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CaseId {
    pub path: String,
    pub name: String,
}

impl CaseId {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.name)
    }
}

/// Result of a single case, shared with reporting hooks
///
/// `index` and `length` are set only for cases that entered the run-list;
/// `duration` and `error` only once the case has executed.
#[derive(Debug, Serialize)]
pub struct CaseResult {
    pub name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(serialize_with = "serialize_durations")]
    pub durations: Vec<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_error"
    )]
    pub error: Option<CaseError>,
}

impl CaseResult {
    pub fn new(id: CaseId) -> Self {
        Self {
            name: id.name,
            path: id.path,
            index: None,
            length: None,
            durations: Vec::new(),
            duration: None,
            error: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Progress through the run-list as a whole percentage
    pub fn progress(&self) -> Option<usize> {
        match (self.index, self.length) {
            (Some(index), Some(length)) if length > 0 => Some(index * 100 / length),
            _ => None,
        }
    }

    /// Median iteration time, only meaningful for repeated cases
    pub fn median_duration(&self) -> Option<Duration> {
        if self.durations.len() < 2 {
            return None;
        }
        let mut sorted = self.durations.clone();
        sorted.sort();
        let median = sorted[sorted.len() / 2];
        (!median.is_zero()).then_some(median)
    }

    /// Operations per second derived from the median iteration time
    pub fn ops_per_sec(&self) -> Option<u64> {
        self.median_duration()
            .map(|median| (1.0 / median.as_secs_f64()).round() as u64)
    }
}

impl fmt::Display for CaseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(index) = self.index {
            write!(f, "{index} ")?;
        }
        write!(f, "{} {}", self.path, self.name)
    }
}

fn serialize_durations<S: Serializer>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(durations.iter().map(Duration::as_secs_f64))
}

fn serialize_error<S: Serializer>(error: &Option<CaseError>, serializer: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_str(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Outcome of a whole run
///
/// The three collections keep the order in which cases were resolved.
#[derive(Debug, Serialize)]
pub struct RunResult {
    pub duration: String,
    pub passed: Vec<CaseResult>,
    pub failed: Vec<CaseResult>,
    pub skipped: Vec<CaseResult>,
}

impl RunResult {
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len() + self.skipped.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Percentage of executed cases that passed
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed.len() + self.failed.len();
        if executed == 0 {
            0.0
        } else {
            (self.passed.len() as f64 / executed as f64) * 100.0
        }
    }
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} passed | {} skipped | {} failed | {}s",
            self.passed.len(),
            self.skipped.len(),
            self.failed.len(),
            self.duration
        )
    }
}
