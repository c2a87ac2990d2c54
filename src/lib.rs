//! kiss-test - a minimal sequential test engine
//!
//! Runs nested trees of test functions registered per module, with
//! name-tag directives and optional bail-on-first-failure.
//!
//! ## Features
//!
//! - Nested maps and lists of tests flattened into space-joined case names
//! - `#only`, `#skip`, `#always` and `#times=N` directives in case names
//! - Sync, async and callback-style tests, panics reported as failures
//! - Start/end reporting hooks awaited around every executed case
//! - Pretty, summary, JSON and CSV output, plus JSON/CSV report files
//!
//! ## Usage
//!
//! ```no_run
//! use kiss_test::{Suite, Test, TestNode, TestRunner};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let suite = Suite::new().module(
//!     "tests/codec.rs",
//!     TestNode::map()
//!         .entry("decodes empty input", Test::sync(|| Ok(())))
//!         .entry("encode #times=100", Test::async_fn(|| async { Ok(()) })),
//! );
//!
//! let result = TestRunner::new().bail(true).run(&suite).await?;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod executor;
pub mod harness;
pub mod models;
pub mod output;
pub mod reporter;
pub mod results;
pub mod suite;
pub mod utils;

pub use executor::TestRunner;
pub use models::{CaseError, CaseId, CaseResult, Directives, RunError, RunResult};
pub use reporter::{ConsoleReporter, Hooks, NoopReporter, Reporter};
pub use suite::{flatten, Done, Outcome, Suite, Test, TestFn, TestNode};
