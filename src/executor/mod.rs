//! Test execution engine
//!
//! Scheduling, the invocation contract, and the sequential run loop.

mod invoke;
mod runner;
mod scheduler;

pub use invoke::invoke;
pub use runner::TestRunner;
pub use scheduler::{plan, schedule, DirectiveSets, Schedule, Scheduled, Selection, SkipReason};
