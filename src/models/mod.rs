//! Data models for test execution
//!
//! Case identities and results, directive metadata, and error types.

mod case;
mod directive;
mod error;

pub use case::{CaseId, CaseResult, RunResult};
pub use directive::Directives;
pub use error::{CaseError, HookKind, RunError};
