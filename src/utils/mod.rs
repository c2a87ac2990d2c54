//! Shared utilities
//!
//! Timing helpers and logging setup.

mod logger;
mod timer;

pub use logger::{init_logger, LogLevel};
pub use timer::{format_secs, Stopwatch, Timer};
