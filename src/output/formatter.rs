//! Output formatters for test results
//!
//! Provides per-case progress lines plus pretty, summary, JSON and CSV
//! renderings of a finished run.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::executor::Selection;
use crate::models::{CaseResult, RunResult};
use crate::results;
use crate::suite::Case;

const GREEN: &str = "32";
const RED: &str = "31";
const YELLOW: &str = "33";
const BLUE: &str = "34";
const MAGENTA: &str = "35";
const CYAN: &str = "36";
const GRAY: &str = "90";

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Summary,
    Json,
    JsonPretty,
    Csv,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" | "table" => Some(OutputFormat::Pretty),
            "summary" => Some(OutputFormat::Summary),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }

    /// Whether per-case progress lines should be printed while running
    pub fn streams_progress(&self) -> bool {
        matches!(self, OutputFormat::Pretty | OutputFormat::Summary)
    }
}

/// Result formatter
#[derive(Clone, Debug)]
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    pub fn with_color(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    fn paint(&self, code: &str, text: impl std::fmt::Display) -> String {
        if self.colorize {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    fn separator(&self) -> String {
        self.paint(GRAY, " | ")
    }

    /// Header line printed when a case starts: `index path name`
    pub fn format_case_start(&self, case: &CaseResult) -> String {
        let index = case.index.map(|i| i.to_string()).unwrap_or_default();
        format!(
            "{} {} {}",
            self.paint(CYAN, index),
            self.paint(MAGENTA, &case.path),
            case.name
        )
    }

    /// Status line printed when a case ends, preceded by its error if any
    pub fn format_case_end(&self, case: &CaseResult) -> String {
        let mut parts = vec![
            if case.is_failed() {
                self.paint(RED, "Failed")
            } else {
                self.paint(GREEN, "Passed")
            },
            self.paint(
                YELLOW,
                format!("{}s", case.duration.as_deref().unwrap_or("0.000")),
            ),
        ];
        if let Some(progress) = case.progress() {
            parts.push(self.paint(CYAN, format!("{progress}%")));
        }
        if let Some(ops) = case.ops_per_sec() {
            parts.push(self.paint(YELLOW, format!("{} op/s", group_thousands(ops))));
        }

        let status = parts.join(&self.separator());
        match &case.error {
            Some(error) => format!("{error:#}\n{status}\n"),
            None => format!("{status}\n"),
        }
    }

    /// Format a finished run
    pub fn format_result(&self, run: &RunResult) -> Result<String> {
        let output = match self.format {
            OutputFormat::Pretty => self.format_result_pretty(run),
            OutputFormat::Summary => self.format_totals(run),
            OutputFormat::Json => {
                serde_json::to_string(run).context("Failed to serialize results")?
            }
            OutputFormat::JsonPretty => {
                serde_json::to_string_pretty(run).context("Failed to serialize results")?
            }
            OutputFormat::Csv => results::to_csv(run)?,
        };
        Ok(output)
    }

    fn format_result_pretty(&self, run: &RunResult) -> String {
        let mut output = String::new();

        if !run.failed.is_empty() {
            output.push_str(&self.paint(RED, "Failures"));
            output.push('\n');
            for case in &run.failed {
                output.push_str(&self.format_case_start(case));
                output.push('\n');
                if let Some(error) = &case.error {
                    output.push_str(&format!("{error:#}\n"));
                }
                output.push('\n');
            }
        }

        output.push_str(&self.format_totals(run));
        output
    }

    /// Totals line: passed | skipped | failed | duration
    pub fn format_totals(&self, run: &RunResult) -> String {
        [
            self.paint(GREEN, format!("{} passed", run.passed.len())),
            self.paint(BLUE, format!("{} skipped", run.skipped.len())),
            self.paint(RED, format!("{} failed", run.failed.len())),
            self.paint(YELLOW, format!("{}s", run.duration)),
        ]
        .join(&self.separator())
    }

    /// Listing of every case with its planned status
    pub fn format_plan(&self, cases: &[Case], selections: &[Selection]) -> String {
        let mut output = String::new();
        for (case, selection) in cases.iter().zip(selections) {
            let status = match selection {
                Selection::Run => self.paint(GREEN, selection),
                Selection::Skip(_) => self.paint(BLUE, selection),
            };
            output.push_str(&format!(
                "{} {} {} [{}]",
                status,
                self.paint(MAGENTA, &case.id.path),
                case.id.name,
                case.test.func().kind()
            ));
            if !case.directives.is_empty() {
                output.push_str(&format!(" {}", self.paint(YELLOW, case.directives)));
            }
            output.push('\n');
        }
        let runnable = selections.iter().filter(|s| **s == Selection::Run).count();
        output.push_str(&format!("{} cases, {} selected", cases.len(), runnable));
        output
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Pretty)
    }
}

/// Render an integer with `,` thousands separators
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaseError, CaseId};
    use std::time::Duration;

    fn finished(name: &str, index: usize, error: Option<CaseError>) -> CaseResult {
        let mut case = CaseResult::new(CaseId::new("tests/a.rs", name));
        case.index = Some(index);
        case.length = Some(4);
        case.durations = vec![Duration::from_millis(2)];
        case.duration = Some("0.002".to_string());
        case.error = error;
        case
    }

    fn run() -> RunResult {
        RunResult {
            duration: "0.010".to_string(),
            passed: vec![finished("ok", 1, None)],
            failed: vec![finished(
                "bad",
                2,
                Some(CaseError::Failed(anyhow::anyhow!("Intentional failure"))),
            )],
            skipped: vec![CaseResult::new(CaseId::new("tests/a.rs", "later #skip"))],
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("PRETTY"), Some(OutputFormat::Pretty));
        assert_eq!(OutputFormat::from_str("unknown"), None);
        assert!(OutputFormat::Pretty.streams_progress());
        assert!(!OutputFormat::Json.streams_progress());
    }

    #[test]
    fn test_case_lines_plain() {
        let formatter = ResultFormatter::new(OutputFormat::Pretty).no_color();
        let ok = finished("ok", 1, None);
        assert_eq!(formatter.format_case_start(&ok), "1 tests/a.rs ok");
        assert_eq!(formatter.format_case_end(&ok), "Passed | 0.002s | 25%\n");

        let bad = finished("bad", 2, Some(CaseError::Panicked("boom".to_string())));
        assert_eq!(
            formatter.format_case_end(&bad),
            "panicked: boom\nFailed | 0.002s | 50%\n"
        );
    }

    #[test]
    fn test_case_end_with_ops() {
        let formatter = ResultFormatter::default().no_color();
        let mut case = finished("bench #times=3", 4, None);
        case.durations = vec![Duration::from_micros(100); 3];
        assert_eq!(
            formatter.format_case_end(&case),
            "Passed | 0.002s | 100% | 10,000 op/s\n"
        );
    }

    #[test]
    fn test_colorized_start_line() {
        let formatter = ResultFormatter::default();
        let line = formatter.format_case_start(&finished("ok", 1, None));
        assert!(line.contains("\x1b[36m1\x1b[0m"));
        assert!(line.ends_with(" ok"));
    }

    #[test]
    fn test_format_pretty_result() {
        let formatter = ResultFormatter::new(OutputFormat::Pretty).no_color();
        let output = formatter.format_result(&run()).unwrap();
        assert!(output.starts_with("Failures\n2 tests/a.rs bad\nIntentional failure\n\n"));
        assert!(output.ends_with("1 passed | 1 skipped | 1 failed | 0.010s"));
    }

    #[test]
    fn test_format_json_result() {
        let formatter = ResultFormatter::new(OutputFormat::Json);
        let value: serde_json::Value =
            serde_json::from_str(&formatter.format_result(&run()).unwrap()).unwrap();
        assert_eq!(value["duration"], "0.010");
        assert_eq!(value["failed"][0]["error"], "Intentional failure");
        assert_eq!(value["skipped"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_format_result_every_format() {
        for format in [
            OutputFormat::Pretty,
            OutputFormat::Summary,
            OutputFormat::Json,
            OutputFormat::JsonPretty,
            OutputFormat::Csv,
        ] {
            let output = ResultFormatter::new(format).no_color().format_result(&run());
            assert!(!output.unwrap().is_empty(), "{format:?}");
        }
        let csv = ResultFormatter::new(OutputFormat::Csv).format_result(&run()).unwrap();
        assert!(csv.starts_with("status,index,path,name"));
    }

    #[test]
    fn test_format_plan_shows_directives() {
        use crate::executor::plan;
        use crate::suite::{Suite, Test, TestNode};

        let suite = Suite::new().module(
            "m.rs",
            TestNode::map()
                .entry("bench #times=3", Test::sync(|| Ok(())))
                .entry("focused", Test::async_fn(|| async { Ok(()) }).only())
                .entry("plain", Test::sync(|| Ok(()))),
        );
        let cases = suite.cases();
        let output = ResultFormatter::default()
            .no_color()
            .format_plan(&cases, &plan(&cases));

        assert_eq!(
            output,
            "skip (only) m.rs bench #times=3 [sync] times=3\n\
             run m.rs focused [async] only\n\
             skip (only) m.rs plain [sync]\n\
             3 cases, 1 selected"
        );
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
