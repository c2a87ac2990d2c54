//! Error types
//!
//! [`CaseError`] is data: it is captured on a case and never escapes the
//! run. [`RunError`] is fatal and is returned from the run itself.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure captured while executing a single case
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("{0:#}")]
    Failed(anyhow::Error),

    #[error("{0:#}")]
    Callback(anyhow::Error),

    #[error("panicked: {0}")]
    Panicked(String),

    #[error("completion callback dropped without being called")]
    CallbackDropped,

    #[error("failed to load module: {0:#}")]
    Load(Arc<anyhow::Error>),
}

impl CaseError {
    /// Build from a panic payload caught with `catch_unwind`
    pub fn panicked(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        CaseError::Panicked(message)
    }

    /// Short label for the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            CaseError::Failed(_) => "error",
            CaseError::Callback(_) => "callback",
            CaseError::Panicked(_) => "panic",
            CaseError::CallbackDropped => "dropped",
            CaseError::Load(_) => "load",
        }
    }
}

/// Reporting hook that raised a fatal error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookKind {
    TestStart,
    TestEnd,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::TestStart => write!(f, "on_test_start"),
            HookKind::TestEnd => write!(f, "on_test_end"),
        }
    }
}

/// Fatal errors that abort a run
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Duplicate test module: {0}")]
    DuplicateModule(String),

    #[error("{hook} hook failed for {path} {name}")]
    Hook {
        hook: HookKind,
        path: String,
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic;

    #[test]
    fn test_panicked_payloads() {
        let payload = panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(CaseError::panicked(payload).to_string(), "panicked: boom");

        let payload = panic::catch_unwind(|| panic!("code {}", 7)).unwrap_err();
        assert_eq!(CaseError::panicked(payload).to_string(), "panicked: code 7");

        let payload = panic::catch_unwind(|| panic::panic_any(42u8)).unwrap_err();
        assert!(matches!(CaseError::panicked(payload), CaseError::Panicked(_)));
    }

    #[test]
    fn test_display_keeps_context_chain() {
        let err = anyhow::anyhow!("root cause").context("while loading");
        let case = CaseError::Load(Arc::new(err));
        assert_eq!(
            case.to_string(),
            "failed to load module: while loading: root cause"
        );
    }

    #[test]
    fn test_hook_error_display() {
        let err = RunError::Hook {
            hook: HookKind::TestEnd,
            path: "mod.rs".to_string(),
            name: "case".to_string(),
            source: anyhow::anyhow!("closed pipe"),
        };
        assert_eq!(err.to_string(), "on_test_end hook failed for mod.rs case");
    }
}
