//! Timer utilities
//!
//! Provides timing and measurement helpers.

use std::time::{Duration, Instant};

/// Format a duration as fractional seconds with millisecond precision
pub fn format_secs(duration: Duration) -> String {
    format!("{:.3}", duration.as_secs_f64())
}

/// Simple timer for measuring elapsed time
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    label: String,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            label: label.into(),
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop timer and return elapsed time
    pub fn stop(self) -> Duration {
        let elapsed = self.elapsed();
        tracing::debug!("{}: {:.3}s", self.label, elapsed.as_secs_f64());
        elapsed
    }
}

/// Stopwatch with lap timing
///
/// Each lap marks the end of one completed iteration; `lap_times` yields the
/// duration of every lap on its own.
#[derive(Debug)]
pub struct Stopwatch {
    start: Instant,
    laps: Vec<Duration>,
}

impl Stopwatch {
    /// Create a new stopwatch
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            laps: Vec::new(),
        }
    }

    /// Record a lap
    pub fn lap(&mut self) {
        self.laps.push(self.start.elapsed());
    }

    /// Get total elapsed time
    pub fn total(&self) -> Duration {
        self.start.elapsed()
    }

    /// Get lap times (duration of each lap, not cumulative)
    pub fn lap_times(&self) -> Vec<Duration> {
        let mut prev = Duration::ZERO;
        self.laps
            .iter()
            .map(|cumulative| {
                let lap_time = cumulative.saturating_sub(prev);
                prev = *cumulative;
                lap_time
            })
            .collect()
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
