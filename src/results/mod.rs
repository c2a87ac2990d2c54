//! Run reports
//!
//! Stamps a finished run with an id and timestamps and exports it as JSON
//! or CSV.

mod export;

pub use export::{export, to_csv, ExportFormat, RunReport};
